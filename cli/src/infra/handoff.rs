//! Handing the terminal over to the launched program.
//!
//! The program is spawned with inherited stdio and awaited; its exit code
//! becomes ours. Interrupts are left to the program: while it runs, Ctrl-C
//! does not end this process, so the working directory can still be cleaned
//! up once the program exits.

use std::ffi::OsString;
use std::path::Path;
use std::process::ExitStatus;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, ProcessHandoff};
use crate::domain::LaunchCommand;
use crate::infra::host::LocalHost;

impl<R: CommandRunner> ProcessHandoff for LocalHost<R> {
    async fn hand_off(&self, command: &LaunchCommand) -> Result<i32> {
        let mut cmd = tokio::process::Command::new(&command.program);
        cmd.args(&command.args).current_dir(&command.cwd);
        if let Some(dir) = &command.path_prepend {
            cmd.env("PATH", prepend_path(dir, std::env::var_os("PATH"))?);
        }

        let program = command.program.display();
        let mut child = cmd
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        let status = loop {
            tokio::select! {
                status = child.wait() => break status,
                signal = tokio::signal::ctrl_c() => {
                    if signal.is_err() {
                        break child.wait().await;
                    }
                    tracing::debug!("interrupt received, waiting for {program} to exit");
                }
            }
        }
        .with_context(|| format!("waiting for {program}"))?;

        let code = exit_code(status);
        tracing::debug!(%program, code, "program exited");
        Ok(code)
    }
}

/// `PATH` value with `dir` in front of `current`.
///
/// # Errors
///
/// Returns an error if `dir` contains the platform's path separator.
pub fn prepend_path(dir: &Path, current: Option<OsString>) -> Result<OsString> {
    let mut entries = vec![dir.to_path_buf()];
    if let Some(current) = current {
        entries.extend(std::env::split_paths(&current));
    }
    std::env::join_paths(entries).context("cannot extend PATH")
}

/// Exit code to report for a finished program.
///
/// A program killed by a signal reports `128 + signal`, the shell convention.
#[must_use]
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
