//! Core business logic module
//!
//! This module contains the dependency locking protocol. File access goes
//! through [`crate::infra`].
//!
//! # Submodules
//!
//! - [`coordinate`] - Module coordinates (`group:name`)
//! - [`lockfile`] - Lock file codec
//! - [`resolution`] - Resolution results, snapshots and the engine interface
//! - [`constraints`] - Constraint injection interface
//! - [`trigger`] - Write trigger and resolution mode
//! - [`session`] - Per-build locking state
//! - [`hooks`] - Before/after resolution hooks
//! - [`configuration`] - Resolvable configurations
//! - [`plugin`] - Hook registration
//! - [`settings`] - Project settings (`deplock.toml`)
//! - [`report`] - JSON resolution reports

pub mod configuration;
pub mod constraints;
pub mod coordinate;
pub mod hooks;
pub mod lockfile;
pub mod plugin;
pub mod report;
pub mod resolution;
pub mod session;
pub mod settings;
pub mod trigger;
