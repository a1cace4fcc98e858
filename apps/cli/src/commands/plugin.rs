use anyhow::Result;
use clap::Subcommand;
use comfy_table::{presets::UTF8_FULL, Table};

use slipstream_engine::{
    AddOutcome, CatalogProvider, NodeDescriptorResolver, NpmBridge, PluginManager,
    ProjectContext, RemoveOutcome, SyncReport, UpdateOutcome,
};

use crate::selector::TerminalSelector;
use crate::ui;

#[derive(Subcommand)]
pub enum PluginCommand {
    /// Install plugins into the project
    Add {
        /// Plugin package name; opens an interactive selection when omitted
        name: Option<String>,
    },
    /// Uninstall plugins and their generated files
    Remove {
        /// Plugin package name; opens an interactive selection when omitted
        name: Option<String>,
    },
    /// Update installed plugins
    Update,
    /// List plugins
    List {
        /// Show the installed plugins instead of the catalog
        #[arg(long)]
        installed: bool,
    },
}

impl PluginCommand {
    pub fn execute(self) -> Result<()> {
        let project = ProjectContext::locate(std::env::current_dir()?)?;
        let catalog = CatalogProvider::bundled()?;
        let bridge = NpmBridge::new(&project);
        let resolver = NodeDescriptorResolver::new(&project);
        let selector = TerminalSelector;
        let manager = PluginManager::new(project, &catalog, &bridge, &resolver, &selector);

        match self {
            Self::Add { name } => add(&manager, name.as_deref()),
            Self::Remove { name } => remove(&manager, name.as_deref()),
            Self::Update => update(&manager),
            Self::List { installed } => list(&manager, installed),
        }
    }
}

fn add(manager: &PluginManager, name: Option<&str>) -> Result<()> {
    match manager.add(name)? {
        AddOutcome::AllInstalled => {
            ui::info("All available plugins are already installed.");
        }
        AddOutcome::NothingSelected => {
            ui::warn("No plugins selected.");
        }
        AddOutcome::AlreadyInstalled(identifier) => {
            ui::warn(format!("Plugin {identifier} is already installed."));
        }
        AddOutcome::Installed(report) => {
            ui::success("Plugins installed successfully!");
            render_report(&report);
            if let Some(name) = name {
                ui::info(format!(
                    "For documentation and examples, visit https://www.npmjs.com/package/{name}"
                ));
            }
        }
    }
    Ok(())
}

fn remove(manager: &PluginManager, name: Option<&str>) -> Result<()> {
    match manager.remove(name)? {
        RemoveOutcome::NothingSelected => {
            ui::warn("No plugins selected.");
        }
        RemoveOutcome::Removed(report) => {
            ui::success("Plugins uninstalled successfully!");
            render_report(&report);
        }
    }
    Ok(())
}

fn update(manager: &PluginManager) -> Result<()> {
    match manager.update()? {
        UpdateOutcome::NothingSelected => {
            ui::warn("No plugins selected.");
        }
        UpdateOutcome::Updated(identifiers) => {
            ui::success(format!(
                "Updated {} plugin(s) successfully!",
                identifiers.len()
            ));
        }
    }
    Ok(())
}

fn list(manager: &PluginManager, installed: bool) -> Result<()> {
    if installed {
        let plugins = manager.list_installed()?;
        if plugins.is_empty() {
            ui::info("No plugins installed.");
            return Ok(());
        }
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_header(vec!["Plugin", "Version"]);
        for (identifier, version) in &plugins {
            table.add_row(vec![identifier.as_str(), version.as_str()]);
        }
        println!("{table}");
    } else {
        let plugins = manager.list_available()?;
        if plugins.is_empty() {
            ui::info("No plugins found in the catalog.");
            return Ok(());
        }
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_header(vec!["Plugin", "Description"]);
        for plugin in &plugins {
            table.add_row(vec![plugin.identifier.as_str(), plugin.description.as_str()]);
        }
        println!("{table}");
    }
    Ok(())
}

/// Per-identifier artifact failures are warnings, not a failed command: the
/// package-level change has already committed and re-running the expensive
/// install step just to fix a file is not worth it.
fn render_report(report: &SyncReport) {
    for failure in &report.failures {
        ui::warn(format!(
            "Plugin files for {} could not be synchronized: {}",
            failure.identifier, failure.error
        ));
    }
}
