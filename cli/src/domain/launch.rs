//! Launch strategy selection and the commands that carry it out.
//!
//! `select` is a pure function of a directory listing: the highest-priority
//! mechanism present wins.

use std::path::{Path, PathBuf};

use crate::domain::bundle::{DEDICATED_LAUNCHER, FALLBACK_RUNNER, infer_command_name, is_package};
use crate::domain::error::LaunchError;
use crate::domain::tools::ToolHandle;

/// Interpreter used for the bundled launcher scripts.
pub const SCRIPT_INTERPRETER: &str = "sh";

/// How the payload gets started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchStrategy {
    /// Launcher script shipped by the publisher.
    DedicatedScript(PathBuf),
    /// Generic interpreter-based runner script.
    FallbackInterpreterScript(PathBuf),
    /// Single packaged-program file, run through the helper.
    PackagedProgramReference { path: PathBuf, command: String },
}

impl LaunchStrategy {
    /// Command that starts the payload with `args` forwarded to it.
    #[must_use]
    pub fn command(&self, helper: &ToolHandle, cwd: &Path, args: &[String]) -> LaunchCommand {
        match self {
            Self::DedicatedScript(script) | Self::FallbackInterpreterScript(script) => {
                let mut argv = vec![script.to_string_lossy().into_owned()];
                argv.extend_from_slice(args);
                LaunchCommand {
                    program: PathBuf::from(SCRIPT_INTERPRETER),
                    args: argv,
                    cwd: cwd.to_path_buf(),
                    path_prepend: helper_dir(helper),
                }
            }
            Self::PackagedProgramReference { path, command } => {
                let mut argv = vec![
                    "tool".to_string(),
                    "run".to_string(),
                    "--from".to_string(),
                    path.to_string_lossy().into_owned(),
                    command.clone(),
                ];
                argv.extend_from_slice(args);
                LaunchCommand {
                    program: helper.program.clone(),
                    args: argv,
                    cwd: cwd.to_path_buf(),
                    path_prepend: None,
                }
            }
        }
    }

    /// Short label for progress output.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::DedicatedScript(p) => format!("launcher script {}", file_name(p)),
            Self::FallbackInterpreterScript(p) => format!("runner script {}", file_name(p)),
            Self::PackagedProgramReference { path, command } => {
                format!("{command} from {}", file_name(path))
            }
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

/// Directory of a helper placed off `PATH`, so scripts can still call it.
fn helper_dir(helper: &ToolHandle) -> Option<PathBuf> {
    if helper.program.is_absolute() {
        helper.program.parent().map(Path::to_path_buf)
    } else {
        None
    }
}

/// Result of strategy selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub strategy: LaunchStrategy,
    /// Packaged-program files passed over when several were present.
    pub ignored_packages: Vec<String>,
}

impl Selection {
    /// Warning for ambiguous bundles, if any.
    #[must_use]
    pub fn warning(&self) -> Option<String> {
        if self.ignored_packages.is_empty() {
            return None;
        }
        let LaunchStrategy::PackagedProgramReference { path, .. } = &self.strategy else {
            return None;
        };
        Some(format!(
            "Bundle has several packaged programs; using {} and ignoring {}",
            file_name(path),
            self.ignored_packages.join(", ")
        ))
    }
}

/// Choose the launch mechanism for a bundle directory.
///
/// Priority: dedicated launcher script, then fallback runner script, then the
/// lexically first packaged-program file. `command_override` replaces the
/// command name inferred from the package file name.
///
/// # Errors
///
/// Returns `LaunchError::NoLaunchableArtifact` if none of the three is present.
pub fn select(
    dir: &Path,
    entries: &[String],
    command_override: Option<&str>,
) -> Result<Selection, LaunchError> {
    let has = |name: &str| entries.iter().any(|e| e == name);

    if has(DEDICATED_LAUNCHER) {
        return Ok(Selection {
            strategy: LaunchStrategy::DedicatedScript(dir.join(DEDICATED_LAUNCHER)),
            ignored_packages: Vec::new(),
        });
    }
    if has(FALLBACK_RUNNER) {
        return Ok(Selection {
            strategy: LaunchStrategy::FallbackInterpreterScript(dir.join(FALLBACK_RUNNER)),
            ignored_packages: Vec::new(),
        });
    }

    let mut packages: Vec<&String> = entries.iter().filter(|e| is_package(e)).collect();
    packages.sort();
    let no_launchable = || LaunchError::NoLaunchableArtifact {
        directory: dir.to_path_buf(),
        entries: entries.to_vec(),
    };
    let (first, rest) = packages.split_first().ok_or_else(no_launchable)?;
    let command = match command_override {
        Some(name) => name.to_string(),
        None => infer_command_name(first).ok_or_else(no_launchable)?,
    };

    Ok(Selection {
        strategy: LaunchStrategy::PackagedProgramReference {
            path: dir.join(first),
            command,
        },
        ignored_packages: rest.iter().map(|s| (*s).clone()).collect(),
    })
}

/// Pick the packaged-program file an install uses.
///
/// Same ordering and command-name rules as `select`, ignoring scripts.
#[must_use]
pub fn install_target(
    dir: &Path,
    entries: &[String],
    command_override: Option<&str>,
) -> Option<(PathBuf, String)> {
    let mut packages: Vec<&String> = entries.iter().filter(|e| is_package(e)).collect();
    packages.sort();
    let first = packages.first()?;
    let command = match command_override {
        Some(name) => name.to_string(),
        None => infer_command_name(first)?,
    };
    Some((dir.join(first), command))
}

/// A program installed onto the host's command path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledReference {
    pub command: String,
    /// Directory the helper places entry points in.
    pub bin_dir: PathBuf,
    /// Platform executable suffix (`.exe` on Windows).
    pub exe_suffix: &'static str,
}

impl InstalledReference {
    /// Absolute path of the installed entry point.
    #[must_use]
    pub fn executable(&self) -> PathBuf {
        self.bin_dir
            .join(format!("{}{}", self.command, self.exe_suffix))
    }

    /// Command that runs the installed program with `args`.
    #[must_use]
    pub fn command_line(&self, cwd: &Path, args: &[String]) -> LaunchCommand {
        LaunchCommand {
            program: self.executable(),
            args: args.to_vec(),
            cwd: cwd.to_path_buf(),
            path_prepend: None,
        }
    }
}

/// A fully resolved process to hand control to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    /// Directory to put in front of `PATH` for the child.
    pub path_prepend: Option<PathBuf>,
}
