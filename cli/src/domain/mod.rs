//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod bundle;
pub mod config;
pub mod error;
pub mod launch;
pub mod platform;
pub mod stage;
pub mod tools;

pub use config::{Overrides, PullrunConfig, Settings, resolve_settings};
pub use error::{ConfigError, LaunchError};
pub use launch::{InstalledReference, LaunchCommand, LaunchStrategy, Selection, select};
pub use stage::{RunStage, StageTracker};
pub use tools::{Capability, ToolHandle, ToolSource};
