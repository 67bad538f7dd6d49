//! CLI argument parsing with clap derive

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use pullrun_common::{Mode, env};

use crate::app::{AppContext, AppFlags};
use crate::commands;
use crate::domain::Overrides;

/// Pull a program from an OCI registry and run or install it
#[derive(Parser, Debug)]
#[command(name = "pullrun", about, disable_version_flag = true)]
pub struct Cli {
    /// Registry host [default: ghcr.io]
    #[arg(long, env = env::REGISTRY, value_name = "HOST")]
    pub registry: Option<String>,

    /// Repository within the registry [default: capten-ai/mise-tasks-mcp]
    #[arg(long, env = env::REPOSITORY, value_name = "ORG/NAME")]
    pub repository: Option<String>,

    /// Tag to pull [default: latest]
    #[arg(long, env = env::VERSION, value_name = "TAG")]
    pub version: Option<String>,

    /// Run the program, install it, or both [default: run]
    #[arg(long, env = env::MODE, value_enum)]
    pub mode: Option<Mode>,

    /// Pull into this directory instead of a temporary one; files from an earlier pull are replaced
    #[arg(long, value_name = "PATH")]
    pub output_dir: Option<PathBuf>,

    /// Command name to run or install, instead of the one inferred from the package file
    #[arg(long, value_name = "NAME")]
    pub command: Option<String>,

    /// Keep the temporary working directory
    #[arg(long)]
    pub keep: bool,

    /// Where missing tools are installed [default: ~/.local/bin]
    #[arg(long, env = env::BIN_DIR, value_name = "PATH")]
    pub bin_dir: Option<PathBuf>,

    /// Show debug logs and full error chains
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR", value_parser = clap::builder::FalseyValueParser::new())]
    pub no_color: bool,

    /// Arguments passed to the launched program
    #[arg(last = true, value_name = "ARGS")]
    pub args: Vec<String>,
}

impl Cli {
    /// Values that override the config file.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            registry: self.registry.clone(),
            repository: self.repository.clone(),
            version: self.version.clone(),
            mode: self.mode,
            bin_dir: self.bin_dir.clone(),
        }
    }

    /// Execute the invocation.
    ///
    /// Returns the exit code to terminate with: the launched program's, or
    /// `0` when nothing was launched.
    ///
    /// # Errors
    ///
    /// Returns an error if any step of the invocation fails.
    pub async fn run(self) -> Result<i32> {
        let app = AppContext::new(&AppFlags {
            no_color: self.no_color,
            quiet: self.quiet,
            verbose: self.verbose,
        });
        let args = commands::launch::LaunchArgs {
            overrides: self.overrides(),
            output_dir: self.output_dir,
            command: self.command,
            keep: self.keep,
            program_args: self.args,
        };
        commands::launch::run(&app, args, &crate::infra::YamlConfigStore).await
    }
}
