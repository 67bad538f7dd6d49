//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` is the production implementation. It runs tools to
//! completion: pulls and installs take as long as the network needs, so no
//! timeout is imposed here.

use std::path::Path;
use std::process::{Output, Stdio};

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;

use crate::application::ports::CommandRunner;

/// Production `CommandRunner` backed by `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioCommandRunner;

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &Path, args: &[&str]) -> Result<Output> {
        tracing::debug!(program = %program.display(), ?args, "running");
        let mut child = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {}", program.display()))?;

        let mut stdout_handle = child.stdout.take();
        let mut stderr_handle = child.stderr.take();

        // Drain both pipes while waiting so a chatty child cannot block on a
        // full pipe buffer.
        let (status, stdout, stderr) = tokio::join!(
            child.wait(),
            async {
                let mut buf = Vec::new();
                if let Some(ref mut h) = stdout_handle {
                    let _ = h.read_to_end(&mut buf).await;
                }
                buf
            },
            async {
                let mut buf = Vec::new();
                if let Some(ref mut h) = stderr_handle {
                    let _ = h.read_to_end(&mut buf).await;
                }
                buf
            },
        );
        Ok(Output {
            status: status.with_context(|| format!("waiting for {}", program.display()))?,
            stdout,
            stderr,
        })
    }
}

/// Turn a failed `Output` into an error carrying the tool's stderr.
///
/// # Errors
///
/// Returns an error when `output` has a non-zero exit status.
pub fn check_success(output: &Output, what: &str) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        anyhow::bail!("{what} exited with {}", output.status);
    }
    anyhow::bail!("{what} exited with {}: {stderr}", output.status)
}
