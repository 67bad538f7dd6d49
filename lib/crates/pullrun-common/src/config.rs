//! Built-in defaults and the environment variable names that override them.

/// Registry host used when neither flag, environment nor config file names one.
pub const DEFAULT_REGISTRY: &str = "ghcr.io";

/// Repository published by this deployment.
pub const DEFAULT_REPOSITORY: &str = "capten-ai/mise-tasks-mcp";

/// Symbolic tag that resolves to the newest published version.
pub const LATEST_VERSION: &str = "latest";

/// Environment variable names.
pub mod env {
    pub const REGISTRY: &str = "REGISTRY";
    pub const REPOSITORY: &str = "REPOSITORY";
    pub const VERSION: &str = "VERSION";
    pub const MODE: &str = "INSTALL_MODE";
    pub const BIN_DIR: &str = "PULLRUN_BIN_DIR";
    pub const CONFIG: &str = "PULLRUN_CONFIG";
}
