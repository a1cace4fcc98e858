//! Plugin-synchronization engine for Slipstream projects.
//!
//! The engine reconciles three independently-mutable sources of truth (the
//! plugin catalog, the project's package manifest, and the generated
//! artifact files under `src/datasources` and `src/eventsources`) behind
//! four operations: add, remove, update and list.
//!
//! Everything is synchronous and single-process. The manifest and artifact
//! files on disk are the only shared state; there is no locking, and
//! concurrent invocations against the same project are unsupported.

pub mod artifacts;
pub mod catalog;
pub mod constants;
pub mod descriptor;
pub mod error;
pub mod manifest;
pub mod npm;
pub mod ops;
pub mod project;
pub mod select;

pub use artifacts::ArtifactSynchronizer;
pub use catalog::{CatalogProvider, PluginDescriptor};
pub use descriptor::{DescriptorResolver, ModuleDescriptor, ModuleRole, NodeDescriptorResolver};
pub use error::PluginError;
pub use npm::{NpmBridge, PackageBridge};
pub use ops::{
    AddOutcome, PluginManager, RemoveOutcome, SyncFailure, SyncReport, UpdateOutcome,
};
pub use project::ProjectContext;
pub use select::{PluginSelector, SelectItem};
