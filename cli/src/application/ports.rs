//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::Output;

use anyhow::Result;

use crate::domain::{InstalledReference, LaunchCommand, ToolSource};

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    async fn run(&self, program: &Path, args: &[&str]) -> Result<Output>;
}

// ── Host Port ─────────────────────────────────────────────────────────────────

/// Raw host identification, before any mapping.
pub trait HostInfo {
    /// Kernel or OS name as reported by the host, e.g. `Linux`.
    fn raw_os(&self) -> String;
    /// CPU architecture as reported by the host, e.g. `x86_64`.
    fn raw_arch(&self) -> String;
    /// Current value of the command search path.
    fn search_path(&self) -> Option<std::ffi::OsString>;
}

// ── Tool Ports ────────────────────────────────────────────────────────────────

/// Checks whether a tool is callable.
#[allow(async_fn_in_trait)]
pub trait ToolProbe {
    /// Run the version query; `true` when it exits successfully.
    async fn is_callable(&self, program: &Path, probe_args: &[&str]) -> bool;
}

/// Downloads and places a pinned tool release.
#[allow(async_fn_in_trait)]
pub trait ToolInstaller {
    /// Install `source` into `bin_dir` and return the placed binary path.
    async fn install_tool(&self, source: &ToolSource, bin_dir: &Path) -> Result<PathBuf>;
}

// ── Registry Port ─────────────────────────────────────────────────────────────

/// The registry client capability.
#[allow(async_fn_in_trait)]
pub trait RegistryClient {
    /// Pull `reference` into `dest` using the client at `client`.
    async fn pull(&self, client: &Path, reference: &str, dest: &Path) -> Result<()>;
}

// ── Bundle Filesystem Port ────────────────────────────────────────────────────

/// Filesystem operations on a fetched bundle.
pub trait BundleFs {
    /// Create a fresh directory inside `parent` for one pull.
    fn stage(&self, parent: &Path) -> Result<PathBuf>;
    /// Move `entries` from `staging` into `dest`, replacing the entries of the
    /// previous publish, then remove `staging`.
    fn publish(&self, staging: &Path, dest: &Path, entries: &[String]) -> Result<()>;
    /// Remove an abandoned staging directory.
    fn discard(&self, staging: &Path) -> Result<()>;
    /// Names of the top-level files in `dir`, sorted.
    fn list(&self, dir: &Path) -> Result<Vec<String>>;
    /// Expand `archive` into `into`, stripping a single common root directory.
    fn expand(&self, archive: &Path, into: &Path) -> Result<()>;
    /// Remove a file.
    fn remove(&self, path: &Path) -> Result<()>;
    /// Read and parse a JSON file, `None` when absent.
    fn read_json(&self, path: &Path) -> Result<Option<serde_json::Value>>;
}

// ── Helper Ports ──────────────────────────────────────────────────────────────

/// The helper's install primitive.
#[allow(async_fn_in_trait)]
pub trait ProgramInstaller {
    /// Install `package` so `command` is invokable from the command path.
    ///
    /// Installing the same package twice must succeed and overwrite.
    async fn install_program(
        &self,
        helper: &Path,
        package: &Path,
        command: &str,
    ) -> Result<InstalledReference>;
}

/// Hands control of the terminal to the payload.
#[allow(async_fn_in_trait)]
pub trait ProcessHandoff {
    /// Start `command` and return its exit code once it exits.
    async fn hand_off(&self, command: &LaunchCommand) -> Result<i32>;
}

/// Composite port — everything an orchestration needs from the outside world.
pub trait LaunchHost:
    HostInfo + ToolProbe + ToolInstaller + RegistryClient + BundleFs + ProgramInstaller + ProcessHandoff
{
}

/// Blanket implementation: any type implementing every sub-trait is a `LaunchHost`.
impl<T> LaunchHost for T where
    T: HostInfo
        + ToolProbe
        + ToolInstaller
        + RegistryClient
        + BundleFs
        + ProgramInstaller
        + ProcessHandoff
{
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Loads the optional config file.
pub trait ConfigStore {
    /// Load the config, returning defaults when the file does not exist.
    fn load(&self) -> Result<crate::domain::PullrunConfig>;
    /// Location of the config file.
    fn path(&self) -> Result<PathBuf>;
}
