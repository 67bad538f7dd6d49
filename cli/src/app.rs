//! Application context — state shared by the command handler.

use crate::infra::{LocalHost, TokioCommandRunner};
use crate::output::{OutputContext, TerminalReporter};

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Debug logging and full error chains.
    pub verbose: bool,
}

/// Unified application context passed to the command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Adapter over the real operating system.
    pub host: LocalHost,
    pub verbose: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    #[must_use]
    pub fn new(flags: &AppFlags) -> Self {
        Self {
            output: OutputContext::new(flags.no_color, flags.quiet),
            host: LocalHost::new(TokioCommandRunner),
            verbose: flags.verbose,
        }
    }

    /// Progress reporter rendering into this context's output.
    #[must_use]
    pub fn terminal_reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }
}
