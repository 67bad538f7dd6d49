//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::tools::Capability;

/// Boxed cause carried by the launch errors that wrap a lower-level failure.
pub type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

// ── Launch errors ─────────────────────────────────────────────────────────────

/// Terminal failures of one invocation. None of them is retried.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Unsupported platform: os '{os}', arch '{arch}'")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("Could not provision {capability}")]
    ProvisioningFailed {
        capability: Capability,
        #[source]
        source: Cause,
    },

    #[error("Could not fetch {reference}")]
    FetchFailed {
        reference: String,
        #[source]
        source: Cause,
    },

    #[error("Pulled {reference} but found no script or packaged program in it (contents: {})", list_entries(.entries))]
    NoArtifactFound {
        reference: String,
        entries: Vec<String>,
    },

    #[error("Nothing to launch in {} (contents: {})", .directory.display(), list_entries(.entries))]
    NoLaunchableArtifact {
        directory: PathBuf,
        entries: Vec<String>,
    },

    #[error("Could not install {command}")]
    InstallFailed {
        command: String,
        #[source]
        source: Cause,
    },
}

impl LaunchError {
    /// Wrap any error as the cause of a provisioning failure.
    pub fn provisioning(capability: Capability, source: impl Into<Cause>) -> Self {
        Self::ProvisioningFailed {
            capability,
            source: source.into(),
        }
    }

    /// Wrap any error as the cause of a fetch failure.
    pub fn fetch(reference: impl Into<String>, source: impl Into<Cause>) -> Self {
        Self::FetchFailed {
            reference: reference.into(),
            source: source.into(),
        }
    }

    /// Wrap any error as the cause of an install failure.
    pub fn install(command: impl Into<String>, source: impl Into<Cause>) -> Self {
        Self::InstallFailed {
            command: command.into(),
            source: source.into(),
        }
    }
}

fn list_entries(entries: &[String]) -> String {
    if entries.is_empty() {
        "empty".to_string()
    } else {
        entries.join(", ")
    }
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to the optional YAML config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot parse config file {}: {message}", .path.display())]
    Invalid { path: PathBuf, message: String },

    #[error("Empty value for {key}")]
    EmptyValue { key: &'static str },
}
