pub mod config;
pub mod types;

pub use config::{DEFAULT_REGISTRY, DEFAULT_REPOSITORY, LATEST_VERSION, env};
pub use types::*;
