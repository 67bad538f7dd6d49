//! `LocalHost` — the production adapter behind every launch port.
//!
//! Each concern lives in its own module (`oras`, `uv`, `handoff`, ...); this
//! file holds the struct and the small host-facing ports.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{BundleFs, CommandRunner, HostInfo, ToolInstaller, ToolProbe};
use crate::domain::tools::ToolSource;
use crate::infra::bundle_fs;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::tool_release;

/// Adapter over the real operating system.
#[derive(Debug, Clone, Default)]
pub struct LocalHost<R: CommandRunner = TokioCommandRunner> {
    pub(crate) runner: R,
}

impl<R: CommandRunner> LocalHost<R> {
    #[must_use]
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    /// The runner tools are invoked through.
    pub fn runner(&self) -> &R {
        &self.runner
    }
}

impl<R: CommandRunner> HostInfo for LocalHost<R> {
    fn raw_os(&self) -> String {
        std::env::consts::OS.to_string()
    }

    fn raw_arch(&self) -> String {
        std::env::consts::ARCH.to_string()
    }

    fn search_path(&self) -> Option<OsString> {
        std::env::var_os("PATH")
    }
}

impl<R: CommandRunner> ToolProbe for LocalHost<R> {
    async fn is_callable(&self, program: &Path, probe_args: &[&str]) -> bool {
        let callable = self
            .runner
            .run(program, probe_args)
            .await
            .is_ok_and(|o| o.status.success());
        tracing::debug!(program = %program.display(), callable, "probed tool");
        callable
    }
}

impl<R: CommandRunner> ToolInstaller for LocalHost<R> {
    async fn install_tool(&self, source: &ToolSource, bin_dir: &Path) -> Result<PathBuf> {
        let source = source.clone();
        let bin_dir = bin_dir.to_path_buf();
        tokio::task::spawn_blocking(move || tool_release::download_and_place(&source, &bin_dir))
            .await
            .context("download task panicked")?
    }
}

impl<R: CommandRunner> BundleFs for LocalHost<R> {
    fn stage(&self, parent: &Path) -> Result<PathBuf> {
        bundle_fs::create_staging(parent)
    }

    fn publish(&self, staging: &Path, dest: &Path, entries: &[String]) -> Result<()> {
        bundle_fs::publish(staging, dest, entries)
    }

    fn discard(&self, staging: &Path) -> Result<()> {
        bundle_fs::discard(staging)
    }

    fn list(&self, dir: &Path) -> Result<Vec<String>> {
        bundle_fs::list_dir(dir)
    }

    fn expand(&self, archive: &Path, into: &Path) -> Result<()> {
        bundle_fs::expand_archive(archive, into)
    }

    fn remove(&self, path: &Path) -> Result<()> {
        bundle_fs::remove_file(path)
    }

    fn read_json(&self, path: &Path) -> Result<Option<serde_json::Value>> {
        bundle_fs::read_json(path)
    }
}

/// Default tool install directory, `~/.local/bin`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn default_bin_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.join(".local").join("bin"))
}
