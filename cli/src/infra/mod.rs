//! Infrastructure layer — concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, tool
//! downloads, archive expansion and the hand-off to the launched program.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod bundle_fs;
pub mod command_runner;
pub mod config;
pub mod handoff;
pub mod host;
pub mod oras;
pub mod tool_release;
pub mod uv;
pub mod workdir;

pub use command_runner::TokioCommandRunner;
pub use config::YamlConfigStore;
pub use host::{LocalHost, default_bin_dir};
pub use workdir::WorkingDirectory;
