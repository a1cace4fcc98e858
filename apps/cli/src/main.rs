mod commands;
mod selector;
mod ui;

use clap::{Parser, Subcommand};
use slipstream_engine::PluginError;

use crate::commands::plugin::PluginCommand;
use crate::commands::scripts;

#[derive(Parser)]
#[command(name = "slipstream")]
#[command(about = "CLI tool for the Slipstream framework", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage eventsource and datasource plugins
    #[command(subcommand)]
    Plugin(PluginCommand),
    /// Run the project development server
    Dev,
    /// Clean the previous build
    Clean,
    /// Create a production build
    Build,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Plugin(cmd) => cmd.execute(),
        Commands::Dev => scripts::run_package_script("dev"),
        Commands::Clean => scripts::run_package_script("clean"),
        Commands::Build => scripts::run_package_script("build"),
    };

    if let Err(err) = result {
        render_error(&err);
        std::process::exit(1);
    }
}

fn render_error(err: &anyhow::Error) {
    ui::error(format!("{err:#}"));
    if let Some(help) = err.downcast_ref::<PluginError>().and_then(suggestion) {
        ui::hint(help);
    }
}

/// A themed, actionable suggestion for the error, when one exists.
fn suggestion(err: &PluginError) -> Option<&'static str> {
    match err {
        PluginError::NotAProject { .. } => {
            Some("slipstream commands only work inside a Slipstream project directory.")
        }
        PluginError::CatalogUnavailable { .. } => {
            Some("Check your network connection, or reinstall the CLI to restore the bundled catalog.")
        }
        PluginError::UnknownPlugin(_) => {
            Some("Run 'slipstream plugin list' to see the available plugins.")
        }
        PluginError::NotInstalled(_) | PluginError::NothingInstalled => {
            Some("Run 'slipstream plugin list --installed' to see what is installed.")
        }
        _ => None,
    }
}
