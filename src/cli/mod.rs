//! Command-line interface module
//!
//! This module handles argument parsing and output formatting.
//! It contains no business logic - that belongs in the [`crate::core`] module.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::defaults::ENV_LOCK_DIR;
use crate::core::settings::LockingSettings;
use crate::infra::store::LockStore;
use commands::Commands;
use output::OutputConfig;

/// Deplock - Dependency-lock consistency enforcement
///
/// Pin resolved dependency versions per configuration and fail builds whose
/// resolution drifts from them.
#[derive(Parser, Debug)]
#[command(name = "deplock")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Project directory (defaults to the current directory)
    #[arg(short = 'C', long, global = true, value_name = "DIR")]
    pub project_dir: Option<PathBuf>,

    /// Lock file directory, relative to the project directory
    #[arg(long, global = true, env = ENV_LOCK_DIR, value_name = "DIR")]
    pub lock_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Everything a command needs to know about the project
#[derive(Debug, Clone)]
pub struct ProjectContext {
    /// Project directory
    pub project_dir: PathBuf,
    /// Lock store of the project
    pub store: LockStore,
    /// Output preferences
    pub output: OutputConfig,
}

impl Cli {
    /// Output preferences from the global flags
    pub fn output_config(&self) -> OutputConfig {
        OutputConfig::new(self.quiet, self.verbose)
    }

    /// Resolve project directory, settings and lock store
    pub fn context(&self) -> Result<ProjectContext> {
        let project_dir = match &self.project_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("Failed to determine current directory")?,
        };

        let settings = LockingSettings::load(&project_dir)
            .with_context(|| format!("Failed to load settings in {}", project_dir.display()))?;
        let store = settings.store(&project_dir, self.lock_dir.as_deref());
        tracing::debug!("Using lock directory {}", store.root().display());

        Ok(ProjectContext {
            project_dir,
            store,
            output: self.output_config(),
        })
    }

    /// Execute the CLI command
    pub async fn run(self) -> Result<()> {
        let context = self.context()?;
        if let Some(cmd) = self.command {
            cmd.run(&context).await
        } else {
            // No subcommand provided, show help
            use clap::CommandFactory;
            let mut cmd = Self::command();
            cmd.print_help()?;
            Ok(())
        }
    }
}
