//! Raw host strings to canonical platform names.
//!
//! Pure functions only. The raw strings come either from `uname`-style kernel
//! names (`Linux`, `Darwin`, `MINGW64_NT-10.0`) or from Rust's
//! `std::env::consts` values (`linux`, `macos`, `windows`); both are accepted.

use pullrun_common::{Arch, Os, Platform};

use crate::domain::error::LaunchError;

/// Map a raw OS name to its canonical value.
#[must_use]
pub fn parse_os(raw: &str) -> Option<Os> {
    let lower = raw.trim().to_ascii_lowercase();
    match lower.as_str() {
        "linux" => Some(Os::Linux),
        "darwin" | "macos" => Some(Os::Darwin),
        "windows" | "windows_nt" => Some(Os::Windows),
        s if s.starts_with("mingw") || s.starts_with("msys") || s.starts_with("cygwin") => {
            Some(Os::Windows)
        }
        _ => None,
    }
}

/// Map a raw CPU architecture name to its canonical value.
#[must_use]
pub fn parse_arch(raw: &str) -> Option<Arch> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "x86_64" | "amd64" | "x64" => Some(Arch::Amd64),
        "aarch64" | "arm64" => Some(Arch::Arm64),
        _ => None,
    }
}

/// Resolve a raw `(os, arch)` pair.
///
/// # Errors
///
/// Returns `LaunchError::UnsupportedPlatform` if either value is unknown.
pub fn resolve(raw_os: &str, raw_arch: &str) -> Result<Platform, LaunchError> {
    match (parse_os(raw_os), parse_arch(raw_arch)) {
        (Some(os), Some(arch)) => Ok(Platform::new(os, arch)),
        _ => Err(LaunchError::UnsupportedPlatform {
            os: raw_os.to_string(),
            arch: raw_arch.to_string(),
        }),
    }
}
