//! External capabilities the launcher depends on, and where to get them.
//!
//! Versions are pinned; release asset names follow each project's own
//! naming convention for the canonical platform.

use std::ffi::OsStr;
use std::fmt;
use std::path::Path;

use pullrun_common::{Arch, Os, Platform};

use crate::domain::bundle::ArchiveKind;

/// Pinned registry client release.
pub const ORAS_VERSION: &str = "1.2.0";

/// Pinned run/install helper release.
pub const UV_VERSION: &str = "0.4.30";

/// The two tools every invocation needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Pulls artifacts from the registry (`oras`).
    RegistryClient,
    /// Installs packaged programs or runs them ephemerally (`uv`).
    Helper,
}

impl Capability {
    /// Command name without platform suffix.
    #[must_use]
    pub fn command(self) -> &'static str {
        match self {
            Self::RegistryClient => "oras",
            Self::Helper => "uv",
        }
    }

    #[must_use]
    pub fn pinned_version(self) -> &'static str {
        match self {
            Self::RegistryClient => ORAS_VERSION,
            Self::Helper => UV_VERSION,
        }
    }

    /// Arguments of the cheap version query used as a presence probe.
    #[must_use]
    pub fn probe_args(self) -> &'static [&'static str] {
        match self {
            Self::RegistryClient => &["version"],
            Self::Helper => &["--version"],
        }
    }

    /// Executable file name on `platform`, e.g. `uv.exe` on Windows.
    #[must_use]
    pub fn binary_name(self, platform: Platform) -> String {
        format!("{}{}", self.command(), platform.exe_suffix())
    }

    /// Download location of the pinned release for `platform`.
    #[must_use]
    pub fn source(self, platform: Platform) -> ToolSource {
        let archive = match platform.os {
            Os::Windows => ArchiveKind::Zip,
            Os::Linux | Os::Darwin => ArchiveKind::TarGz,
        };
        let (url, asset, checksum_url) = match self {
            Self::RegistryClient => {
                let base = format!(
                    "https://github.com/oras-project/oras/releases/download/v{ORAS_VERSION}"
                );
                let asset = format!(
                    "oras_{ORAS_VERSION}_{}_{}.{}",
                    platform.os,
                    platform.arch,
                    archive.extension()
                );
                (
                    format!("{base}/{asset}"),
                    asset,
                    format!("{base}/oras_{ORAS_VERSION}_checksums.txt"),
                )
            }
            Self::Helper => {
                let base =
                    format!("https://github.com/astral-sh/uv/releases/download/{UV_VERSION}");
                let asset = format!("uv-{}.{}", uv_target(platform), archive.extension());
                (
                    format!("{base}/{asset}"),
                    asset.clone(),
                    format!("{base}/{asset}.sha256"),
                )
            }
        };
        ToolSource {
            capability: self,
            url,
            asset,
            checksum_url,
            archive,
            binary: self.binary_name(platform),
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RegistryClient => f.write_str("registry client (oras)"),
            Self::Helper => f.write_str("run/install helper (uv)"),
        }
    }
}

/// Rust target triple used in uv release asset names.
fn uv_target(platform: Platform) -> &'static str {
    match (platform.os, platform.arch) {
        (Os::Linux, Arch::Amd64) => "x86_64-unknown-linux-gnu",
        (Os::Linux, Arch::Arm64) => "aarch64-unknown-linux-gnu",
        (Os::Darwin, Arch::Amd64) => "x86_64-apple-darwin",
        (Os::Darwin, Arch::Arm64) => "aarch64-apple-darwin",
        (Os::Windows, Arch::Amd64) => "x86_64-pc-windows-msvc",
        (Os::Windows, Arch::Arm64) => "aarch64-pc-windows-msvc",
    }
}

/// A pinned, platform-specific release asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSource {
    pub capability: Capability,
    /// Direct download URL of the archive.
    pub url: String,
    /// Asset file name, as listed in checksum files.
    pub asset: String,
    /// URL of the published SHA-256 checksum (single-line or list format).
    pub checksum_url: String,
    pub archive: ArchiveKind,
    /// File name of the executable inside the archive.
    pub binary: String,
}

/// A provisioned capability: what to invoke to reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolHandle {
    pub capability: Capability,
    /// Bare command name when found on `PATH`, absolute path otherwise.
    pub program: std::path::PathBuf,
}

/// Find the expected SHA-256 for `asset` in a published checksum file.
///
/// Accepts both a single `<hash>` / `<hash>  <file>` line and the multi-line
/// `<hash>  <file>` list format. A bare hash without a file name only counts
/// when it is the whole file.
#[must_use]
pub fn expected_checksum(content: &str, asset: &str) -> Option<String> {
    let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();
    if let [only] = lines.as_slice() {
        let mut parts = only.split_whitespace();
        if let (Some(hash), None) = (parts.next(), parts.next()) {
            return Some(hash.to_ascii_lowercase());
        }
    }
    lines.iter().find_map(|line| {
        let mut parts = line.split_whitespace();
        let hash = parts.next()?;
        let name = parts.next()?;
        (name.trim_start_matches('*') == asset).then(|| hash.to_ascii_lowercase())
    })
}

/// Whether `dir` is one of the entries of a `PATH`-style variable.
#[must_use]
pub fn dir_on_path(path_var: Option<&OsStr>, dir: &Path) -> bool {
    path_var.is_some_and(|value| std::env::split_paths(value).any(|entry| entry == dir))
}

/// Encode bytes as lowercase hex string.
#[must_use]
pub fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(char::from(HEX[(b >> 4) as usize]));
        out.push(char::from(HEX[(b & 0xf) as usize]));
    }
    out
}
