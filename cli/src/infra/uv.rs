//! The run/install helper capability, backed by the `uv` CLI.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, ProgramInstaller};
use crate::domain::InstalledReference;
use crate::infra::command_runner::check_success;
use crate::infra::host::LocalHost;

impl<R: CommandRunner> ProgramInstaller for LocalHost<R> {
    async fn install_program(
        &self,
        helper: &Path,
        package: &Path,
        command: &str,
    ) -> Result<InstalledReference> {
        let package = package.to_string_lossy();
        let output = self
            .runner
            .run(helper, &["tool", "install", "--force", &package])
            .await?;
        check_success(&output, "uv tool install")?;

        let output = self.runner.run(helper, &["tool", "dir", "--bin"]).await?;
        check_success(&output, "uv tool dir")?;
        let bin_dir = String::from_utf8(output.stdout)
            .context("uv tool dir printed invalid UTF-8")?
            .trim()
            .to_string();
        anyhow::ensure!(!bin_dir.is_empty(), "uv tool dir printed nothing");

        Ok(InstalledReference {
            command: command.to_string(),
            bin_dir: PathBuf::from(bin_dir),
            exe_suffix: std::env::consts::EXE_SUFFIX,
        })
    }
}
