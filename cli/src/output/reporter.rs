//! `TerminalReporter` — Presentation-layer implementation of `ProgressReporter`.
//!
//! Wraps `&OutputContext` so application services can emit progress events
//! without depending on any presentation type directly. On a terminal, a
//! step runs a spinner that the next success replaces; elsewhere every event
//! is a plain line on stderr.

use std::cell::RefCell;

use indicatif::ProgressBar;
use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::{OutputContext, progress};

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// - `step()` shows `"  → {message}"` or a spinner
/// - `success()` shows `"  ✓ {message}"`
/// - `warn()` shows `"  ! {message}"`
///
/// All three are suppressed when `ctx.quiet`.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    active: RefCell<Option<ProgressBar>>,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self {
            ctx,
            active: RefCell::new(None),
        }
    }

    /// Clear any running spinner, e.g. before handing the terminal over.
    pub fn finish(&self) {
        if let Some(pb) = self.active.borrow_mut().take() {
            progress::abandon(&pb);
        }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        if self.ctx.quiet {
            return;
        }
        self.finish();
        if self.ctx.show_progress() {
            *self.active.borrow_mut() = Some(progress::spinner(message));
        } else {
            eprintln!("  {} {message}", "→".style(self.ctx.styles.step));
        }
    }

    fn success(&self, message: &str) {
        if self.ctx.quiet {
            return;
        }
        if let Some(pb) = self.active.borrow_mut().take() {
            progress::finish_ok(&pb, message);
        } else {
            self.ctx.success(message);
        }
    }

    fn warn(&self, message: &str) {
        if self.ctx.quiet {
            return;
        }
        match self.active.borrow().as_ref() {
            Some(pb) => pb.suspend(|| self.ctx.warn(message)),
            None => self.ctx.warn(message),
        }
    }
}

impl Drop for TerminalReporter<'_> {
    fn drop(&mut self) {
        self.finish();
    }
}
