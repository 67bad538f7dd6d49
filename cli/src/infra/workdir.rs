//! The directory an artifact is pulled into.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

/// Working directory for one invocation.
///
/// Ephemeral directories are removed when dropped. A persistent directory
/// belongs to the caller and is never removed or cleared.
#[derive(Debug)]
pub enum WorkingDirectory {
    Ephemeral(TempDir),
    Persistent(PathBuf),
}

impl WorkingDirectory {
    /// Create a fresh directory under the system temp dir.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn ephemeral() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("pullrun-")
            .tempdir()
            .context("cannot create temporary working directory")?;
        Ok(Self::Ephemeral(dir))
    }

    /// Use `path` as the working directory, creating it if needed.
    ///
    /// Existing contents are left in place; only entries from an earlier
    /// pull are replaced when the next bundle is published into it.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` exists but is not a directory, or cannot
    /// be created.
    pub fn persistent(path: &Path) -> Result<Self> {
        match std::fs::metadata(path) {
            Ok(meta) => anyhow::ensure!(
                meta.is_dir(),
                "output directory {} exists and is not a directory",
                path.display()
            ),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                std::fs::create_dir_all(path)
                    .with_context(|| format!("cannot create {}", path.display()))?;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("cannot inspect {}", path.display()));
            }
        }
        Ok(Self::Persistent(path.to_path_buf()))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Ephemeral(dir) => dir.path(),
            Self::Persistent(path) => path,
        }
    }

    /// Stop an ephemeral directory from being removed; returns its path.
    #[must_use]
    pub fn keep(self) -> PathBuf {
        match self {
            Self::Ephemeral(dir) => dir.keep(),
            Self::Persistent(path) => path,
        }
    }
}
