//! Installing a packaged program onto the host's command path.

use std::path::Path;

use anyhow::Result;

use crate::application::ports::{ProgramInstaller, ProgressReporter};
use crate::domain::LaunchError;
use crate::domain::launch::{InstalledReference, install_target};
use crate::domain::tools::ToolHandle;

/// Install the bundle's packaged program with the helper.
///
/// Reinstalling the same package overwrites the previous installation and
/// yields the same command name.
///
/// # Errors
///
/// Returns `LaunchError::InstallFailed` if the bundle has no packaged-program
/// file or the helper's install primitive fails.
pub async fn install(
    dir: &Path,
    entries: &[String],
    command_override: Option<&str>,
    helper: &ToolHandle,
    host: &impl ProgramInstaller,
    reporter: &impl ProgressReporter,
) -> Result<InstalledReference> {
    let Some((package, command)) = install_target(dir, entries, command_override) else {
        return Err(LaunchError::install(
            dir.display().to_string(),
            anyhow::anyhow!("no packaged-program file in {}", dir.display()),
        )
        .into());
    };

    reporter.step(&format!("Installing {command}..."));
    tracing::debug!(package = %package.display(), %command, "installing package");
    let installed = host
        .install_program(&helper.program, &package, &command)
        .await
        .map_err(|e| LaunchError::install(&command, e))?;

    reporter.success(&format!(
        "{command} installed to {}",
        installed.bin_dir.display()
    ));
    Ok(installed)
}
