//! `pullrun` — pull an artifact and run and/or install it.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::application::{LaunchRequest, orchestrate};
use crate::domain::{Overrides, resolve_settings};
use crate::infra::{WorkingDirectory, default_bin_dir};

/// Everything the command line asked for.
#[derive(Debug, Default)]
pub struct LaunchArgs {
    pub overrides: Overrides,
    pub output_dir: Option<PathBuf>,
    pub command: Option<String>,
    pub keep: bool,
    pub program_args: Vec<String>,
}

/// Run one invocation and return the exit code to terminate with.
///
/// # Errors
///
/// Returns an error if the config file is invalid, the working directory
/// cannot be prepared, or any orchestration step fails.
pub async fn run(app: &AppContext, args: LaunchArgs, store: &impl ConfigStore) -> Result<i32> {
    let config = store.load().context("loading config")?;
    let settings = resolve_settings(args.overrides, &config, default_bin_dir()?)?;

    let work = match &args.output_dir {
        Some(dir) => WorkingDirectory::persistent(dir)?,
        None => WorkingDirectory::ephemeral()?,
    };
    tracing::debug!(
        reference = %settings.coordinate,
        mode = %settings.mode,
        work_dir = %work.path().display(),
        bin_dir = %settings.bin_dir.display(),
        "resolved settings"
    );
    if app.verbose {
        app.output.kv("artifact", &settings.coordinate.reference());
        app.output.kv("mode", &settings.mode.to_string());
    }

    let request = LaunchRequest {
        coordinate: settings.coordinate,
        mode: settings.mode,
        work_dir: work.path().to_path_buf(),
        bin_dir: settings.bin_dir,
        command_override: args.command,
        program_args: args.program_args,
    };

    let reporter = app.terminal_reporter();
    let result = orchestrate(&request, &app.host, &reporter).await;
    reporter.finish();

    if args.keep {
        let kept = work.keep();
        app.output.kv("working directory", &kept.display().to_string());
    }
    Ok(result?.exit_code)
}
