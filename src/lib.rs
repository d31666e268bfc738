//! Deplock - Dependency-lock consistency enforcement
//!
//! This library pins a build tool's dependency resolution to previously
//! recorded module versions, checks that each resolution still matches them,
//! and regenerates the records when asked to.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Locking protocol: codec, hooks, session, plugin
//! - [`infra`] - Infrastructure layer (lock store, filesystem)
//! - [`config`] - Configuration and constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;

#[cfg(test)]
pub mod test_utils;
