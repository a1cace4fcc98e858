use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the plugin engine.
///
/// Project, catalog and manifest errors abort an operation before any
/// mutation. A failed package-manager invocation aborts the whole batch.
/// Descriptor and artifact errors are per-identifier: the orchestrator
/// collects them into a report instead of aborting the remaining batch.
#[derive(Error, Debug)]
pub enum PluginError {
    #[error("not a Slipstream project: missing {missing}")]
    NotAProject { missing: &'static str },

    #[error("plugin catalog unavailable: {reason}")]
    CatalogUnavailable { reason: String },

    #[error("could not read package manifest {path}: {reason}")]
    ManifestUnreadable { path: PathBuf, reason: String },

    #[error("unknown plugin '{0}'")]
    UnknownPlugin(String),

    #[error("plugin '{0}' is not installed")]
    NotInstalled(String),

    #[error("no eventsource or datasource plugins are installed")]
    NothingInstalled,

    #[error("npm {operation} failed: {detail}")]
    PackageOperationFailed {
        operation: &'static str,
        detail: String,
    },

    #[error("could not resolve module descriptor for '{identifier}': {reason}")]
    DescriptorResolution { identifier: String, reason: String },

    #[error("plugin '{identifier}' reports unknown module type '{value}'")]
    UnknownModuleType { identifier: String, value: String },

    #[error("failed to write artifact {path}: {reason}")]
    ArtifactWrite { path: PathBuf, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
