//! Tool provisioning: make sure a capability is callable, installing the
//! pinned release when it is not.

use std::path::{Path, PathBuf};

use anyhow::Result;
use pullrun_common::Platform;

use crate::application::ports::{HostInfo, ProgressReporter, ToolInstaller, ToolProbe};
use crate::domain::LaunchError;
use crate::domain::tools::{Capability, ToolHandle, dir_on_path};

/// Ensure `capability` can be invoked, returning how to invoke it.
///
/// Looks on the search path first, then in `bin_dir`. Only when both probes
/// fail is the pinned release downloaded into `bin_dir`, after which the
/// placed binary is probed again. A second call right after a successful one
/// finds the tool and installs nothing.
///
/// # Errors
///
/// Returns `LaunchError::ProvisioningFailed` if the download or placement
/// fails, or if the placed binary still does not answer its version query.
pub async fn ensure(
    capability: Capability,
    platform: Platform,
    bin_dir: &Path,
    host: &(impl HostInfo + ToolProbe + ToolInstaller),
    reporter: &impl ProgressReporter,
) -> Result<ToolHandle> {
    let binary = capability.binary_name(platform);
    let probe = capability.probe_args();

    let on_path = PathBuf::from(capability.command());
    if host.is_callable(&on_path, probe).await {
        tracing::debug!(%capability, "found on search path");
        return Ok(handle(capability, on_path));
    }

    let placed = bin_dir.join(&binary);
    if host.is_callable(&placed, probe).await {
        tracing::debug!(%capability, path = %placed.display(), "found in install directory");
        return Ok(handle(capability, placed));
    }

    reporter.step(&format!(
        "Installing {} {}...",
        capability.command(),
        capability.pinned_version()
    ));
    let source = capability.source(platform);
    tracing::info!(url = %source.url, dest = %bin_dir.display(), "downloading tool");
    let installed = host
        .install_tool(&source, bin_dir)
        .await
        .map_err(|e| LaunchError::provisioning(capability, e))?;

    if !host.is_callable(&installed, probe).await {
        return Err(LaunchError::provisioning(
            capability,
            anyhow::anyhow!(
                "{} was placed at {} but does not run",
                capability.command(),
                installed.display()
            ),
        )
        .into());
    }

    if !dir_on_path(host.search_path().as_deref(), bin_dir) {
        reporter.warn(&format!(
            "{} is not on your PATH. Add it with: export PATH=\"{}:$PATH\"",
            bin_dir.display(),
            bin_dir.display()
        ));
    }
    reporter.success(&format!(
        "{} {} installed",
        capability.command(),
        capability.pinned_version()
    ));
    Ok(handle(capability, installed))
}

fn handle(capability: Capability, program: PathBuf) -> ToolHandle {
    ToolHandle {
        capability,
        program,
    }
}
