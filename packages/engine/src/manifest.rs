//! Installed-set reader.
//!
//! The project's package manifest is the source of truth for "installed":
//! a plugin is installed iff a dependency entry under the plugin namespace
//! exists for it.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::constants::PLUGIN_NAMESPACE;
use crate::error::PluginError;
use crate::project::ProjectContext;

#[derive(Debug, Default, Deserialize)]
struct PackageManifest {
    #[serde(default)]
    dependencies: BTreeMap<String, String>,
}

/// Returns the installed plugins, keyed by identifier with the version
/// requirement recorded in the manifest.
///
/// Ordinary dependencies sharing the manifest are excluded; only entries
/// under the plugin namespace qualify. The map is ordered so listings and
/// batches are deterministic.
pub fn installed_plugins(
    project: &ProjectContext,
) -> Result<BTreeMap<String, String>, PluginError> {
    let path = project.manifest_path();
    let raw = std::fs::read_to_string(&path).map_err(|err| PluginError::ManifestUnreadable {
        path: path.clone(),
        reason: err.to_string(),
    })?;
    let manifest: PackageManifest =
        serde_json::from_str(&raw).map_err(|err| PluginError::ManifestUnreadable {
            path,
            reason: err.to_string(),
        })?;

    Ok(manifest
        .dependencies
        .into_iter()
        .filter(|(name, _)| name.starts_with(PLUGIN_NAMESPACE))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{PACKAGE_MANIFEST, PROJECT_MARKER};

    fn project_with_manifest(manifest: &str) -> (tempfile::TempDir, ProjectContext) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(PROJECT_MARKER), "").unwrap();
        std::fs::write(dir.path().join(PACKAGE_MANIFEST), manifest).unwrap();
        let project = ProjectContext::locate(dir.path()).unwrap();
        (dir, project)
    }

    #[test]
    fn filters_out_ordinary_dependencies() {
        let (_dir, project) = project_with_manifest(
            r#"{
                "dependencies": {
                    "@slipstream/plugins-express": "^1.0.2",
                    "@slipstream/plugins-kafka": "~0.3.0",
                    "express": "^4.18.0",
                    "@types/node": "^20.0.0"
                }
            }"#,
        );

        let installed = installed_plugins(&project).unwrap();
        assert_eq!(installed.len(), 2);
        assert!(installed.keys().all(|k| k.starts_with("@slipstream/plugins")));
        assert_eq!(installed["@slipstream/plugins-express"], "^1.0.2");
    }

    #[test]
    fn empty_when_no_plugin_dependencies() {
        let (_dir, project) =
            project_with_manifest(r#"{"dependencies": {"express": "^4.18.0"}}"#);
        assert!(installed_plugins(&project).unwrap().is_empty());
    }

    #[test]
    fn empty_when_dependencies_section_missing() {
        let (_dir, project) = project_with_manifest(r#"{"name": "demo"}"#);
        assert!(installed_plugins(&project).unwrap().is_empty());
    }

    #[test]
    fn unparseable_manifest_is_reported() {
        let (_dir, project) = project_with_manifest("not json at all {");
        let err = installed_plugins(&project).unwrap_err();
        assert!(matches!(err, PluginError::ManifestUnreadable { .. }));
    }
}
