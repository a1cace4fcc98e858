use std::path::{Path, PathBuf};

use crate::constants::{PACKAGE_MANIFEST, PROJECT_MARKER};
use crate::error::PluginError;

/// A validated Slipstream project root.
///
/// Construction proves the directory carries both the project marker and a
/// package manifest. Every project-relative path the engine touches is
/// derived from here, so tests can point the whole stack at a sandbox
/// directory.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    root: PathBuf,
}

impl ProjectContext {
    /// Validates `root` as a Slipstream project.
    pub fn locate(root: impl Into<PathBuf>) -> Result<Self, PluginError> {
        let root = root.into();
        if !root.join(PROJECT_MARKER).is_file() {
            return Err(PluginError::NotAProject {
                missing: PROJECT_MARKER,
            });
        }
        if !root.join(PACKAGE_MANIFEST).is_file() {
            return Err(PluginError::NotAProject {
                missing: PACKAGE_MANIFEST,
            });
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(PACKAGE_MANIFEST)
    }

    /// Root of the data-source artifact tree.
    pub fn datasources_dir(&self) -> PathBuf {
        self.root.join("src").join("datasources")
    }

    /// Root of the event-source artifact tree.
    pub fn eventsources_dir(&self) -> PathBuf {
        self.root.join("src").join("eventsources")
    }
}
