//! Module descriptor resolver.
//!
//! A plugin package describes how it wires into a project through four
//! well-known exports: `SourceType`, `Type`, `CONFIG_FILE_NAME` and
//! `DEFAULT_CONFIG`. Resolution loads the installed package in the project's
//! node runtime and reads them back as JSON. This is the one place the
//! engine crosses into plugin-authored code; plugin identity is treated as
//! untrusted dynamic input and nothing beyond reading the exports is assumed
//! about the load.

use std::path::PathBuf;
use std::process::Command;

use serde::Deserialize;

use crate::error::PluginError;
use crate::project::ProjectContext;

/// Structural role a plugin fills in the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleRole {
    DataSource,
    EventSource,
    Both,
}

impl ModuleRole {
    fn parse(identifier: &str, value: &str) -> Result<Self, PluginError> {
        match value {
            "DS" => Ok(Self::DataSource),
            "ES" => Ok(Self::EventSource),
            "BOTH" => Ok(Self::Both),
            other => Err(PluginError::UnknownModuleType {
                identifier: identifier.to_string(),
                value: other.to_string(),
            }),
        }
    }

    /// True when the role populates the data-source tree.
    pub fn has_data_source(self) -> bool {
        matches!(self, Self::DataSource | Self::Both)
    }

    /// True when the role populates the event-source tree.
    pub fn has_event_source(self) -> bool {
        matches!(self, Self::EventSource | Self::Both)
    }
}

/// The metadata block a plugin package exposes. Derived on demand and never
/// persisted: removal re-resolves it while the package is still installed.
#[derive(Debug, Clone)]
pub struct ModuleDescriptor {
    pub role: ModuleRole,
    /// Names the generated type stub and the `type:` key of config files.
    pub loader_id: String,
    /// Names the generated YAML config file.
    pub config_id: String,
    /// Seed configuration merged into generated config files.
    pub default_config: serde_json::Map<String, serde_json::Value>,
}

/// Wire format printed by the probe script.
#[derive(Debug, Deserialize)]
struct RawDescriptor {
    #[serde(rename = "moduleType")]
    module_type: String,
    #[serde(rename = "loaderFileName")]
    loader_file_name: String,
    #[serde(rename = "yamlFileName")]
    yaml_file_name: String,
    #[serde(rename = "defaultConfig", default)]
    default_config: serde_json::Map<String, serde_json::Value>,
}

/// Resolves plugin metadata from an installed package.
pub trait DescriptorResolver {
    fn resolve(&self, identifier: &str) -> Result<ModuleDescriptor, PluginError>;
}

/// `DescriptorResolver` that evaluates the plugin inside the project's node
/// runtime. The child call blocks until the runtime exits.
pub struct NodeDescriptorResolver {
    project_root: PathBuf,
}

impl NodeDescriptorResolver {
    pub fn new(project: &ProjectContext) -> Self {
        Self {
            project_root: project.root().to_path_buf(),
        }
    }

    fn probe_script(identifier: &str) -> String {
        format!(
            r#"
try {{
    const mod = require('{identifier}');
    console.log(JSON.stringify({{
        moduleType: mod.SourceType,
        loaderFileName: mod.Type,
        yamlFileName: mod.CONFIG_FILE_NAME,
        defaultConfig: mod.DEFAULT_CONFIG || {{}}
    }}));
}} catch (e) {{
    console.error(e.message);
    process.exit(1);
}}
"#
        )
    }
}

impl DescriptorResolver for NodeDescriptorResolver {
    fn resolve(&self, identifier: &str) -> Result<ModuleDescriptor, PluginError> {
        let node = which::which("node").map_err(|err| PluginError::DescriptorResolution {
            identifier: identifier.to_string(),
            reason: format!("node not found on PATH: {err}"),
        })?;

        tracing::debug!(%identifier, "resolving module descriptor");
        let output = Command::new(node)
            .arg("-e")
            .arg(Self::probe_script(identifier))
            .current_dir(&self.project_root)
            .output()
            .map_err(|err| PluginError::DescriptorResolution {
                identifier: identifier.to_string(),
                reason: err.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = match stderr.trim() {
                "" => format!("module probe failed ({})", output.status),
                detail => detail.to_string(),
            };
            return Err(PluginError::DescriptorResolution {
                identifier: identifier.to_string(),
                reason,
            });
        }

        parse_probe_output(identifier, &output.stdout)
    }
}

fn parse_probe_output(identifier: &str, stdout: &[u8]) -> Result<ModuleDescriptor, PluginError> {
    let raw: RawDescriptor =
        serde_json::from_slice(stdout).map_err(|err| PluginError::DescriptorResolution {
            identifier: identifier.to_string(),
            reason: format!("malformed probe output: {err}"),
        })?;
    let role = ModuleRole::parse(identifier, &raw.module_type)?;
    Ok(ModuleDescriptor {
        role,
        loader_id: raw.loader_file_name,
        config_id: raw.yaml_file_name,
        default_config: raw.default_config,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_complete_probe_output() {
        let stdout = br#"{
            "moduleType": "BOTH",
            "loaderFileName": "mongo",
            "yamlFileName": "mongo-cfg",
            "defaultConfig": {"uri": "mongodb://localhost"}
        }"#;

        let descriptor = parse_probe_output("@slipstream/plugins-mongo", stdout).unwrap();
        assert_eq!(descriptor.role, ModuleRole::Both);
        assert_eq!(descriptor.loader_id, "mongo");
        assert_eq!(descriptor.config_id, "mongo-cfg");
        assert_eq!(
            descriptor.default_config["uri"],
            serde_json::json!("mongodb://localhost")
        );
    }

    #[test]
    fn default_config_is_optional() {
        let stdout =
            br#"{"moduleType": "ES", "loaderFileName": "kafka", "yamlFileName": "kafka"}"#;
        let descriptor = parse_probe_output("@slipstream/plugins-kafka", stdout).unwrap();
        assert_eq!(descriptor.role, ModuleRole::EventSource);
        assert!(descriptor.default_config.is_empty());
    }

    #[test]
    fn missing_required_field_is_a_resolution_error() {
        let stdout = br#"{"loaderFileName": "kafka", "yamlFileName": "kafka"}"#;
        let err = parse_probe_output("@slipstream/plugins-kafka", stdout).unwrap_err();
        assert!(matches!(err, PluginError::DescriptorResolution { .. }));
    }

    #[test]
    fn role_outside_the_three_values_is_rejected() {
        let stdout =
            br#"{"moduleType": "SIDECAR", "loaderFileName": "x", "yamlFileName": "x"}"#;
        let err = parse_probe_output("@slipstream/plugins-x", stdout).unwrap_err();
        match err {
            PluginError::UnknownModuleType { identifier, value } => {
                assert_eq!(identifier, "@slipstream/plugins-x");
                assert_eq!(value, "SIDECAR");
            }
            other => panic!("expected UnknownModuleType, got {other:?}"),
        }
    }

    #[test]
    fn role_flags_cover_both() {
        assert!(ModuleRole::Both.has_data_source());
        assert!(ModuleRole::Both.has_event_source());
        assert!(ModuleRole::DataSource.has_data_source());
        assert!(!ModuleRole::DataSource.has_event_source());
        assert!(!ModuleRole::EventSource.has_data_source());
    }
}
