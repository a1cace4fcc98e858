use anyhow::{Context, Result};
use std::process::Command;

use slipstream_engine::ProjectContext;

/// Runs a package script (`npm run <script>`) in the project root with
/// inherited stdio, after the usual project check.
pub fn run_package_script(script: &str) -> Result<()> {
    let project = ProjectContext::locate(std::env::current_dir()?)?;
    let npm = which::which("npm").context("npm not found on PATH")?;

    tracing::debug!(script, "running package script");
    let status = Command::new(npm)
        .arg("run")
        .arg(script)
        .current_dir(project.root())
        .status()
        .with_context(|| format!("failed to run npm run {script}"))?;

    if !status.success() {
        anyhow::bail!("npm run {script} failed ({status})");
    }
    Ok(())
}
