//! Catalog provider.
//!
//! The list of installable plugins comes from a bundled snapshot file when
//! present, or from an npm registry search under the plugin namespace when
//! it is not.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};

use crate::constants::{PLUGIN_NAMESPACE, SNAPSHOT_DIR, SNAPSHOT_FILE};
use crate::error::PluginError;

/// An installable plugin as advertised by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDescriptor {
    /// Fully namespaced package identifier.
    #[serde(rename = "value")]
    pub identifier: String,
    /// Short display name shown in selection menus.
    #[serde(rename = "name")]
    pub display_name: String,
    pub description: String,
}

/// One entry of `npm search --json` output. Fields beyond these are ignored.
#[derive(Debug, Deserialize)]
struct SearchEntry {
    name: String,
    #[serde(default)]
    description: String,
}

pub struct CatalogProvider {
    snapshot_path: PathBuf,
}

impl CatalogProvider {
    pub fn new(snapshot_path: impl Into<PathBuf>) -> Self {
        Self {
            snapshot_path: snapshot_path.into(),
        }
    }

    /// Provider reading the snapshot bundled beside the running executable.
    pub fn bundled() -> std::io::Result<Self> {
        let exe = std::env::current_exe()?;
        let dir = exe.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(Self::new(dir.join(SNAPSHOT_DIR).join(SNAPSHOT_FILE)))
    }

    /// Lists installable plugins.
    ///
    /// The bundled snapshot wins when it is present and parseable; otherwise
    /// the registry is searched. An empty list is a valid "no plugins found"
    /// result, distinct from `CatalogUnavailable`, which is raised only when
    /// both sources fail.
    pub fn list_available(&self) -> Result<Vec<PluginDescriptor>, PluginError> {
        match self.load_snapshot() {
            Ok(plugins) => Ok(plugins),
            Err(reason) => {
                tracing::debug!(%reason, "catalog snapshot unusable, querying registry");
                self.search_registry()
            }
        }
    }

    fn load_snapshot(&self) -> Result<Vec<PluginDescriptor>, String> {
        let raw = std::fs::read_to_string(&self.snapshot_path).map_err(|e| e.to_string())?;
        serde_json::from_str(&raw).map_err(|e| e.to_string())
    }

    fn search_registry(&self) -> Result<Vec<PluginDescriptor>, PluginError> {
        let npm = which::which("npm").map_err(|err| PluginError::CatalogUnavailable {
            reason: format!("npm not found on PATH: {err}"),
        })?;
        let output = Command::new(npm)
            .arg("search")
            .arg(PLUGIN_NAMESPACE)
            .arg("--json")
            .output()
            .map_err(|err| PluginError::CatalogUnavailable {
                reason: err.to_string(),
            })?;
        if !output.status.success() {
            return Err(PluginError::CatalogUnavailable {
                reason: format!("npm search failed ({})", output.status),
            });
        }
        let entries: Vec<SearchEntry> =
            serde_json::from_slice(&output.stdout).map_err(|err| {
                PluginError::CatalogUnavailable {
                    reason: format!("malformed search output: {err}"),
                }
            })?;
        Ok(descriptors_from_search(entries))
    }
}

/// Maps registry search hits to catalog entries. Packages that do not follow
/// the `...plugins-<name>` naming convention are skipped.
fn descriptors_from_search(entries: Vec<SearchEntry>) -> Vec<PluginDescriptor> {
    entries
        .into_iter()
        .filter_map(|entry| {
            let display_name = entry
                .name
                .split_once("plugins-")
                .map(|(_, rest)| rest.to_string())?;
            Some(PluginDescriptor {
                identifier: entry.name,
                display_name,
                description: entry.description,
            })
        })
        .collect()
}
