//! Platform identification use-case.

use pullrun_common::Platform;

use crate::application::ports::HostInfo;
use crate::domain::LaunchError;
use crate::domain::platform::resolve;

/// Map the host's raw OS and architecture names onto a canonical platform.
///
/// The host is queried exactly once per call.
///
/// # Errors
///
/// Returns `LaunchError::UnsupportedPlatform` naming both raw values when
/// either one is outside the supported set.
pub fn identify(host: &impl HostInfo) -> Result<Platform, LaunchError> {
    let os = host.raw_os();
    let arch = host.raw_arch();
    let platform = resolve(&os, &arch)?;
    tracing::debug!(%os, %arch, %platform, "identified platform");
    Ok(platform)
}
