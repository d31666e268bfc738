//! Infrastructure layer
//!
//! Handles all I/O operations on lock files and their directory.
//! This module is the only place where side effects occur.

pub mod filesystem;
pub mod store;
