//! Orchestration stages and their legal transitions.

use std::fmt;

use pullrun_common::Mode;

/// Where an invocation is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Idle,
    Provisioning,
    Fetching,
    Running,
    Installing,
    InstallingThenRunning,
    Done,
    Failed,
}

impl RunStage {
    /// Stage entered after fetching for the given mode.
    #[must_use]
    pub fn after_fetch(mode: Mode) -> Self {
        match mode {
            Mode::Run => Self::Running,
            Mode::Install => Self::Installing,
            Mode::Both => Self::InstallingThenRunning,
        }
    }

    /// Whether `self → next` is a legal transition.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        use RunStage::{
            Done, Failed, Fetching, Idle, Installing, InstallingThenRunning, Provisioning, Running,
        };
        match (self, next) {
            (Idle, Provisioning)
            | (Provisioning, Fetching)
            | (Fetching, Running | Installing | InstallingThenRunning)
            | (Running | Installing | InstallingThenRunning, Done) => true,
            (Done | Failed, _) => false,
            (_, Failed) => true,
            _ => false,
        }
    }

    /// Terminal stages end the invocation.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Provisioning => "provisioning",
            Self::Fetching => "fetching",
            Self::Running => "running",
            Self::Installing => "installing",
            Self::InstallingThenRunning => "installing then running",
            Self::Done => "done",
            Self::Failed => "failed",
        })
    }
}

/// Tracks the current stage and the path taken so far.
#[derive(Debug, Clone)]
pub struct StageTracker {
    current: RunStage,
    history: Vec<RunStage>,
}

impl Default for StageTracker {
    fn default() -> Self {
        Self {
            current: RunStage::Idle,
            history: vec![RunStage::Idle],
        }
    }
}

impl StageTracker {
    #[must_use]
    pub fn current(&self) -> RunStage {
        self.current
    }

    /// Every stage entered, starting with `Idle`.
    #[must_use]
    pub fn history(&self) -> &[RunStage] {
        &self.history
    }

    /// Move to `next`.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is not legal from the current stage.
    pub fn advance(&mut self, next: RunStage) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.current.can_transition_to(next),
            "illegal stage transition: {} -> {next}",
            self.current
        );
        self.current = next;
        self.history.push(next);
        Ok(())
    }

    /// Record a failure. A no-op once a terminal stage is reached.
    pub fn fail(&mut self) {
        if !self.current.is_terminal() {
            self.current = RunStage::Failed;
            self.history.push(RunStage::Failed);
        }
    }
}
