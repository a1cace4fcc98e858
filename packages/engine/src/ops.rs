//! The orchestrator behind the four public plugin operations.
//!
//! Add installs packages first and generates artifacts second; Remove runs
//! in the opposite order, because descriptor resolution needs the package to
//! still be present. The package-manager step is atomic for the whole batch,
//! while the artifact phase allows partial completion: per-identifier
//! failures are collected into a [`SyncReport`] rather than rolling back
//! identifiers that already succeeded.

use std::collections::{BTreeMap, HashMap};

use crate::artifacts::ArtifactSynchronizer;
use crate::catalog::{CatalogProvider, PluginDescriptor};
use crate::descriptor::DescriptorResolver;
use crate::error::PluginError;
use crate::manifest;
use crate::npm::PackageBridge;
use crate::project::ProjectContext;
use crate::select::{PluginSelector, SelectItem};

/// Per-identifier failure recorded during an artifact phase.
#[derive(Debug)]
pub struct SyncFailure {
    pub identifier: String,
    pub error: PluginError,
}

/// Result of the artifact phase of a batch. Failures here are diagnostics,
/// not fatal: the package-level change has already committed.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub synced: Vec<String>,
    pub failures: Vec<SyncFailure>,
}

impl SyncReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug)]
pub enum AddOutcome {
    /// Every catalog plugin is already present; nothing to offer.
    AllInstalled,
    /// The user dismissed the selection menu.
    NothingSelected,
    /// The named plugin is already installed; nothing was touched.
    AlreadyInstalled(String),
    /// Packages installed, with the artifact-phase report.
    Installed(SyncReport),
}

#[derive(Debug)]
pub enum RemoveOutcome {
    /// The user dismissed the selection menu.
    NothingSelected,
    /// Packages uninstalled, with the artifact-cleanup report.
    Removed(SyncReport),
}

#[derive(Debug)]
pub enum UpdateOutcome {
    /// The user dismissed the selection menu.
    NothingSelected,
    /// The listed plugins were updated. Artifacts are left untouched:
    /// descriptors are assumed stable across versions.
    Updated(Vec<String>),
}

pub struct PluginManager<'a> {
    project: ProjectContext,
    catalog: &'a CatalogProvider,
    bridge: &'a dyn PackageBridge,
    resolver: &'a dyn DescriptorResolver,
    selector: &'a dyn PluginSelector,
    artifacts: ArtifactSynchronizer,
}

impl<'a> PluginManager<'a> {
    pub fn new(
        project: ProjectContext,
        catalog: &'a CatalogProvider,
        bridge: &'a dyn PackageBridge,
        resolver: &'a dyn DescriptorResolver,
        selector: &'a dyn PluginSelector,
    ) -> Self {
        let artifacts = ArtifactSynchronizer::new(&project);
        Self {
            project,
            catalog,
            bridge,
            resolver,
            selector,
            artifacts,
        }
    }

    /// Installs one named plugin, or an interactively chosen set of the
    /// plugins not yet installed.
    pub fn add(&self, name: Option<&str>) -> Result<AddOutcome, PluginError> {
        let available = self.catalog.list_available()?;
        let installed = manifest::installed_plugins(&self.project)?;

        let batch: Vec<String> = match name {
            Some(name) => {
                if !available.iter().any(|p| p.identifier == name) {
                    return Err(PluginError::UnknownPlugin(name.to_string()));
                }
                if installed.contains_key(name) {
                    return Ok(AddOutcome::AlreadyInstalled(name.to_string()));
                }
                vec![name.to_string()]
            }
            None => {
                let missing: Vec<&PluginDescriptor> = available
                    .iter()
                    .filter(|p| !installed.contains_key(&p.identifier))
                    .collect();
                if missing.is_empty() {
                    return Ok(AddOutcome::AllInstalled);
                }
                let items: Vec<SelectItem> = missing
                    .iter()
                    .map(|p| SelectItem {
                        identifier: p.identifier.clone(),
                        label: p.display_name.clone(),
                        description: p.description.clone(),
                    })
                    .collect();
                let chosen = self
                    .selector
                    .select("Select plugins to install", &items)?;
                if chosen.is_empty() {
                    return Ok(AddOutcome::NothingSelected);
                }
                chosen
            }
        };

        // The bridge call is atomic for the batch: if it fails, no manifest
        // mutation is assumed and no artifacts are created.
        self.bridge.install(&batch)?;
        tracing::info!(count = batch.len(), "plugins installed");

        let mut report = SyncReport::default();
        for identifier in &batch {
            let result = self
                .resolver
                .resolve(identifier)
                .and_then(|descriptor| self.artifacts.create(identifier, &descriptor));
            match result {
                Ok(()) => report.synced.push(identifier.clone()),
                Err(error) => {
                    tracing::warn!(%identifier, %error, "artifact generation failed");
                    report.failures.push(SyncFailure {
                        identifier: identifier.clone(),
                        error,
                    });
                }
            }
        }
        Ok(AddOutcome::Installed(report))
    }

    /// Uninstalls one named plugin, or an interactively chosen set of the
    /// installed plugins.
    pub fn remove(&self, name: Option<&str>) -> Result<RemoveOutcome, PluginError> {
        let installed = manifest::installed_plugins(&self.project)?;
        if installed.is_empty() {
            return Err(PluginError::NothingInstalled);
        }

        let batch: Vec<String> = match name {
            Some(name) => {
                if !installed.contains_key(name) {
                    return Err(PluginError::NotInstalled(name.to_string()));
                }
                vec![name.to_string()]
            }
            None => {
                let items = self.installed_items(&installed);
                let chosen = self
                    .selector
                    .select("Select plugins to uninstall", &items)?;
                if chosen.is_empty() {
                    return Ok(RemoveOutcome::NothingSelected);
                }
                chosen
            }
        };

        // Descriptors must be resolved while the packages are still
        // installed, so artifact cleanup runs before the uninstall batch. An
        // identifier whose resolution fails skips cleanup but stays in the
        // batch.
        let mut report = SyncReport::default();
        for identifier in &batch {
            let result = self
                .resolver
                .resolve(identifier)
                .and_then(|descriptor| self.artifacts.remove(identifier, &descriptor));
            match result {
                Ok(()) => report.synced.push(identifier.clone()),
                Err(error) => {
                    tracing::warn!(%identifier, %error, "artifact cleanup skipped");
                    report.failures.push(SyncFailure {
                        identifier: identifier.clone(),
                        error,
                    });
                }
            }
        }

        self.bridge.uninstall(&batch)?;
        tracing::info!(count = batch.len(), "plugins uninstalled");
        Ok(RemoveOutcome::Removed(report))
    }

    /// Updates an interactively chosen set of the installed plugins.
    pub fn update(&self) -> Result<UpdateOutcome, PluginError> {
        let installed = manifest::installed_plugins(&self.project)?;
        if installed.is_empty() {
            return Err(PluginError::NothingInstalled);
        }

        let items = self.installed_items(&installed);
        let chosen = self.selector.select("Select plugins to update", &items)?;
        if chosen.is_empty() {
            return Ok(UpdateOutcome::NothingSelected);
        }

        self.bridge.update(&chosen)?;
        tracing::info!(count = chosen.len(), "plugins updated");
        Ok(UpdateOutcome::Updated(chosen))
    }

    /// The installed set, keyed by identifier with the version requirement.
    pub fn list_installed(&self) -> Result<BTreeMap<String, String>, PluginError> {
        manifest::installed_plugins(&self.project)
    }

    /// The catalog of installable plugins.
    pub fn list_available(&self) -> Result<Vec<PluginDescriptor>, PluginError> {
        self.catalog.list_available()
    }

    /// Menu rows for the installed set, enriched with catalog descriptions
    /// when the catalog is reachable.
    fn installed_items(&self, installed: &BTreeMap<String, String>) -> Vec<SelectItem> {
        let descriptions: HashMap<String, String> = self
            .catalog
            .list_available()
            .map(|plugins| {
                plugins
                    .into_iter()
                    .map(|p| (p.identifier, p.description))
                    .collect()
            })
            .unwrap_or_default();

        installed
            .keys()
            .map(|identifier| SelectItem {
                identifier: identifier.clone(),
                label: identifier.clone(),
                description: descriptions
                    .get(identifier)
                    .cloned()
                    .unwrap_or_else(|| "No description available".to_string()),
            })
            .collect()
    }
}
