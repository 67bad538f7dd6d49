//! Config file schema and settings resolution.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use std::path::PathBuf;

use pullrun_common::{
    ArtifactCoordinate, DEFAULT_REGISTRY, DEFAULT_REPOSITORY, LATEST_VERSION, Mode,
};
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Config schema ────────────────────────────────────────────────────────────

/// Optional defaults stored in `~/.pullrun/config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PullrunConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    /// Where provisioned tools are placed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bin_dir: Option<PathBuf>,
}

// ── Resolution ───────────────────────────────────────────────────────────────

/// Values given on the command line or through environment variables.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub registry: Option<String>,
    pub repository: Option<String>,
    pub version: Option<String>,
    pub mode: Option<Mode>,
    pub bin_dir: Option<PathBuf>,
}

/// Effective settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub coordinate: ArtifactCoordinate,
    pub mode: Mode,
    pub bin_dir: PathBuf,
}

/// Merge overrides, config file and built-in defaults, in that order.
///
/// # Errors
///
/// Returns `ConfigError::EmptyValue` if the winning registry, repository or
/// version is empty.
pub fn resolve_settings(
    overrides: Overrides,
    config: &PullrunConfig,
    default_bin_dir: PathBuf,
) -> Result<Settings, ConfigError> {
    let registry = pick("registry", overrides.registry, &config.registry, DEFAULT_REGISTRY)?;
    let repository = pick(
        "repository",
        overrides.repository,
        &config.repository,
        DEFAULT_REPOSITORY,
    )?;
    let version = pick("version", overrides.version, &config.version, LATEST_VERSION)?;

    Ok(Settings {
        coordinate: ArtifactCoordinate::new(registry, repository, version),
        mode: overrides.mode.or(config.mode).unwrap_or_default(),
        bin_dir: overrides
            .bin_dir
            .or_else(|| config.bin_dir.clone())
            .unwrap_or(default_bin_dir),
    })
}

fn pick(
    key: &'static str,
    flag: Option<String>,
    config: &Option<String>,
    default: &str,
) -> Result<String, ConfigError> {
    let value = flag
        .or_else(|| config.clone())
        .unwrap_or_else(|| default.to_string());
    if value.trim().is_empty() {
        return Err(ConfigError::EmptyValue { key });
    }
    Ok(value)
}
