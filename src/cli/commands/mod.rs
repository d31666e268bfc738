//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod constraints;
pub mod list;
pub mod resolve;
pub mod show;

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;

use crate::cli::ProjectContext;
use crate::core::trigger::ResolutionMode;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the constraints locking injects into configurations
    Constraints {
        /// Configuration names
        #[arg(required = true)]
        configurations: Vec<String>,
    },

    /// Check a resolution report against the lock files
    Verify {
        /// Resolution report (JSON)
        report: PathBuf,

        /// Number of configurations resolved in parallel
        #[arg(short, long)]
        jobs: Option<usize>,
    },

    /// Write the versions of a resolution report as the new lock state
    Write {
        /// Resolution report (JSON)
        report: PathBuf,

        /// Number of configurations resolved in parallel
        #[arg(short, long)]
        jobs: Option<usize>,
    },

    /// Show the locked modules of a configuration
    Show {
        /// Configuration name
        configuration: String,
    },

    /// List configurations that have a lock file
    List,
}

impl Commands {
    /// Execute the command
    pub async fn run(self, context: &ProjectContext) -> Result<()> {
        match self {
            Self::Constraints { configurations } => {
                constraints::execute(context, &configurations).await
            }
            Self::Verify { report, jobs } => {
                resolve::execute(context, &report, ResolutionMode::Validate, jobs).await
            }
            Self::Write { report, jobs } => {
                resolve::execute(context, &report, ResolutionMode::Write, jobs).await
            }
            Self::Show { configuration } => show::execute(context, &configuration).await,
            Self::List => list::execute(context).await,
        }
    }
}
