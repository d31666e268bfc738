//! Output formatting and progress indicators
//!
//! This module provides utilities for displaying progress bars,
//! status lines, and errors to the user.

use indicatif::{ProgressBar, ProgressStyle};

/// Status message prefixes
pub mod status {
    /// Success prefix (green checkmark)
    pub const SUCCESS: &str = "✓";

    /// Error prefix (red X)
    pub const ERROR: &str = "✗";

    /// Info prefix (blue circle)
    pub const INFO: &str = "ℹ";
}

/// Output preferences from the global flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputConfig {
    quiet: bool,
    verbose: u8,
}

impl OutputConfig {
    pub fn new(quiet: bool, verbose: u8) -> Self {
        Self { quiet, verbose }
    }

    /// Whether details are printed
    pub fn is_verbose(&self) -> bool {
        !self.quiet && self.verbose > 0
    }

    /// Log filter directive for the tracing subscriber
    pub fn log_level(&self) -> tracing::Level {
        match (self.quiet, self.verbose) {
            (true, _) => tracing::Level::ERROR,
            (false, 0) => tracing::Level::WARN,
            (false, 1) => tracing::Level::INFO,
            (false, _) => tracing::Level::DEBUG,
        }
    }

    /// Print a status line unless quiet
    pub fn status(&self, prefix: &str, message: &str) {
        if !self.quiet {
            println!("{prefix} {message}");
        }
    }

    /// Print a plain line unless quiet
    pub fn line(&self, message: &str) {
        if !self.quiet {
            println!("{message}");
        }
    }

    /// Progress bar over configurations, hidden when quiet
    pub fn progress_bar(&self, total: u64) -> ProgressBar {
        if self.quiet {
            return ProgressBar::hidden();
        }
        create_resolution_bar(total)
    }
}

/// Create a progress bar for configuration resolution
pub fn create_resolution_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} configurations ({msg})")
            .expect("Invalid progress bar template")
            .progress_chars("█▓▒░"),
    );
    pb
}

/// Print an error and its causes to stderr
pub fn display_error(error: &anyhow::Error) {
    eprintln!("{} Error: {error}", status::ERROR);
    for cause in error.chain().skip(1) {
        eprintln!("  Caused by: {cause}");
    }
}
