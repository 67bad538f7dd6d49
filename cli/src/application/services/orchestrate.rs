//! The mode state machine: provision, fetch, then run and/or install.

use std::path::PathBuf;

use anyhow::{Context, Result};
use pullrun_common::{ArtifactCoordinate, Mode, Platform};

use crate::application::ports::{LaunchHost, ProgressReporter};
use crate::application::services::{fetch, install, platform, provision};
use crate::domain::launch::{InstalledReference, Selection, select};
use crate::domain::stage::{RunStage, StageTracker};
use crate::domain::tools::{Capability, ToolHandle};

/// Everything one invocation needs, already resolved.
#[derive(Debug, Clone)]
pub struct LaunchRequest {
    pub coordinate: ArtifactCoordinate,
    pub mode: Mode,
    /// Fresh directory the artifact is pulled into.
    pub work_dir: PathBuf,
    /// Where missing tools are placed.
    pub bin_dir: PathBuf,
    pub command_override: Option<String>,
    /// Arguments forwarded to the launched program.
    pub program_args: Vec<String>,
}

/// What a successful invocation did.
#[derive(Debug, Clone)]
pub struct LaunchOutcome {
    pub platform: Platform,
    /// Stages entered, from `Idle` to `Done`.
    pub stages: Vec<RunStage>,
    /// Strategy chosen in `Run` mode.
    pub selection: Option<Selection>,
    /// Installation made in `Install` and `Both` modes.
    pub installed: Option<InstalledReference>,
    /// Exit code of the launched program, `0` when nothing was launched.
    pub exit_code: i32,
}

/// Drive one invocation to a terminal stage.
///
/// # Errors
///
/// Returns the first failure unchanged; typed failures can be recovered with
/// `downcast_ref::<LaunchError>()`. Nothing is retried.
pub async fn orchestrate(
    request: &LaunchRequest,
    host: &impl LaunchHost,
    reporter: &impl ProgressReporter,
) -> Result<LaunchOutcome> {
    let mut stages = StageTracker::default();
    match drive(request, host, reporter, &mut stages).await {
        Ok(outcome) => Ok(outcome),
        Err(e) => {
            let from = stages.current();
            stages.fail();
            tracing::debug!(%from, "invocation failed");
            Err(e)
        }
    }
}

async fn drive(
    request: &LaunchRequest,
    host: &impl LaunchHost,
    reporter: &impl ProgressReporter,
    stages: &mut StageTracker,
) -> Result<LaunchOutcome> {
    enter(stages, RunStage::Provisioning)?;
    let platform = platform::identify(host)?;
    let client = provision::ensure(
        Capability::RegistryClient,
        platform,
        &request.bin_dir,
        host,
        reporter,
    )
    .await?;
    let helper = provision::ensure(
        Capability::Helper,
        platform,
        &request.bin_dir,
        host,
        reporter,
    )
    .await?;

    enter(stages, RunStage::Fetching)?;
    reporter.step(&format!("Pulling {}...", request.coordinate));
    let entries = fetch::fetch(&request.coordinate, &request.work_dir, &client, host).await?;
    reporter.success(&format!("Pulled {}", request.coordinate));

    enter(stages, RunStage::after_fetch(request.mode))?;
    let command_override = request.command_override.as_deref();
    let mut outcome = LaunchOutcome {
        platform,
        stages: Vec::new(),
        selection: None,
        installed: None,
        exit_code: 0,
    };

    match request.mode {
        Mode::Run => {
            let selection = select(&request.work_dir, &entries, command_override)?;
            if let Some(warning) = selection.warning() {
                tracing::warn!("{warning}");
                reporter.warn(&warning);
            }
            outcome.exit_code = launch_selected(request, &selection, &helper, host, reporter).await?;
            outcome.selection = Some(selection);
        }
        Mode::Install => {
            let installed = install::install(
                &request.work_dir,
                &entries,
                command_override,
                &helper,
                host,
                reporter,
            )
            .await?;
            outcome.installed = Some(installed);
        }
        Mode::Both => {
            let installed = install::install(
                &request.work_dir,
                &entries,
                command_override,
                &helper,
                host,
                reporter,
            )
            .await?;
            let command = installed.command_line(&request.work_dir, &request.program_args);
            reporter.success(&format!("Starting {}", installed.command));
            tracing::debug!(program = %command.program.display(), args = ?command.args, "handing off");
            outcome.exit_code = host
                .hand_off(&command)
                .await
                .with_context(|| format!("failed to start {}", command.program.display()))?;
            outcome.installed = Some(installed);
        }
    }

    enter(stages, RunStage::Done)?;
    outcome.stages = stages.history().to_vec();
    Ok(outcome)
}

async fn launch_selected(
    request: &LaunchRequest,
    selection: &Selection,
    helper: &ToolHandle,
    host: &impl LaunchHost,
    reporter: &impl ProgressReporter,
) -> Result<i32> {
    let command = selection
        .strategy
        .command(helper, &request.work_dir, &request.program_args);
    reporter.success(&format!("Starting {}", selection.strategy.describe()));
    tracing::debug!(program = %command.program.display(), args = ?command.args, "handing off");
    host.hand_off(&command)
        .await
        .with_context(|| format!("failed to start {}", selection.strategy.describe()))
}

fn enter(stages: &mut StageTracker, next: RunStage) -> Result<()> {
    let from = stages.current();
    stages.advance(next)?;
    tracing::debug!(%from, to = %next, "stage transition");
    Ok(())
}
