//! Infrastructure implementation of the `ConfigStore` port.

use anyhow::{Context, Result};
use std::path::PathBuf;

use pullrun_common::env;

use crate::application::ports::ConfigStore;
use crate::domain::config::PullrunConfig;
use crate::domain::error::ConfigError;

/// Production implementation of `ConfigStore` that reads a YAML file on disk.
pub struct YamlConfigStore;

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<PullrunConfig> {
        let path = self.path()?;
        if !path.exists() {
            return Ok(PullrunConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(PullrunConfig::default());
        }
        serde_yaml::from_str(&content).map_err(|e| {
            anyhow::Error::from(ConfigError::Invalid {
                path,
                message: e.to_string(),
            })
        })
    }

    fn path(&self) -> Result<PathBuf> {
        if let Some(val) = std::env::var_os(env::CONFIG) {
            return Ok(PathBuf::from(val));
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(home.join(".pullrun").join("config.yaml"))
    }
}
