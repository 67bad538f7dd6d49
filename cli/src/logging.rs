//! Diagnostic logging to stderr via `tracing`.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset and `--verbose` is not given.
pub const DEFAULT_FILTER: &str = "warn";

/// Filter used for `--verbose`.
pub const VERBOSE_FILTER: &str = "pullrun=debug,pullrun_cli=debug";

/// Pick the filter directives: `RUST_LOG` wins, then `--verbose`.
#[must_use]
pub fn filter(verbose: bool, rust_log: Option<&str>) -> String {
    match rust_log {
        Some(directives) if !directives.trim().is_empty() => directives.to_string(),
        _ if verbose => VERBOSE_FILTER.to_string(),
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// Install the global subscriber. Safe to call more than once.
pub fn init(verbose: bool) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let directives = filter(verbose, rust_log.as_deref());
    let env_filter =
        EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
