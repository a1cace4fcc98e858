//! Package manager bridge.
//!
//! All package-level mutation is delegated to the external package manager.
//! Each operation is a single batched invocation covering every listed
//! identifier; it succeeds or fails as one unit and reports no partial
//! per-identifier results.

use std::path::PathBuf;
use std::process::Command;

use crate::error::PluginError;
use crate::project::ProjectContext;

/// Flags appended to every invocation to keep npm's output terse.
const QUIET_FLAGS: [&str; 4] = ["--quiet", "--no-warnings", "--silent", "--progress=false"];

pub trait PackageBridge {
    fn install(&self, identifiers: &[String]) -> Result<(), PluginError>;
    fn uninstall(&self, identifiers: &[String]) -> Result<(), PluginError>;
    fn update(&self, identifiers: &[String]) -> Result<(), PluginError>;
}

/// `PackageBridge` backed by the npm executable, run in the project root
/// with stdout/stderr passed through to the user. Calls block until npm
/// exits.
pub struct NpmBridge {
    project_root: PathBuf,
}

impl NpmBridge {
    pub fn new(project: &ProjectContext) -> Self {
        Self {
            project_root: project.root().to_path_buf(),
        }
    }

    fn run(&self, operation: &'static str, identifiers: &[String]) -> Result<(), PluginError> {
        let npm = which::which("npm").map_err(|err| PluginError::PackageOperationFailed {
            operation,
            detail: format!("npm not found on PATH: {err}"),
        })?;

        tracing::debug!(operation, count = identifiers.len(), "invoking npm");
        let status = Command::new(npm)
            .arg(operation)
            .args(identifiers)
            .args(QUIET_FLAGS)
            .current_dir(&self.project_root)
            .status()
            .map_err(|err| PluginError::PackageOperationFailed {
                operation,
                detail: err.to_string(),
            })?;

        if !status.success() {
            return Err(PluginError::PackageOperationFailed {
                operation,
                detail: status.to_string(),
            });
        }
        Ok(())
    }
}

impl PackageBridge for NpmBridge {
    fn install(&self, identifiers: &[String]) -> Result<(), PluginError> {
        self.run("install", identifiers)
    }

    fn uninstall(&self, identifiers: &[String]) -> Result<(), PluginError> {
        self.run("uninstall", identifiers)
    }

    fn update(&self, identifiers: &[String]) -> Result<(), PluginError> {
        self.run("update", identifiers)
    }
}
