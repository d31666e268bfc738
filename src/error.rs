//! Error types for deplock
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Lock file content errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LockFileError {
    /// A lock line could not be split into module and version
    #[error("Malformed lock entry '{line}': {reason}")]
    MalformedEntry { line: String, reason: &'static str },

    /// A module coordinate part is empty or contains the separator
    #[error("Invalid module coordinate '{group}:{name}': {reason}")]
    InvalidCoordinate {
        group: String,
        name: String,
        reason: &'static str,
    },

    /// A version cannot be written as the last part of a lock line
    #[error("Invalid version {version:?}: {reason}")]
    InvalidVersion {
        version: String,
        reason: &'static str,
    },
}

/// The recorded lock state no longer matches a resolution
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LockOutOfDate {
    /// A locked module is no longer part of the resolution result
    #[error(
        "Dependency lock state for configuration '{configuration}' is out of date: \
         lock file contained module '{entry}' but it is not part of the resolved modules"
    )]
    MissingModule { configuration: String, entry: String },

    /// A locked module resolved to a different version
    #[error(
        "Dependency lock state for configuration '{configuration}' is out of date: \
         lock file expected '{expected}' but resolution result was '{actual}'"
    )]
    VersionMismatch {
        configuration: String,
        expected: String,
        actual: String,
    },
}

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to create directory
    #[error("Failed to create directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write file
    #[error("Failed to write file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to read file
    #[error("Failed to read file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to list directory
    #[error("Failed to list directory '{path}': {source}")]
    ListDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Configuration graph errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigurationError {
    /// Configuration not found
    #[error("Configuration '{name}' not found")]
    NotFound { name: String },

    /// Configuration declared twice
    #[error("Configuration '{name}' already exists")]
    AlreadyExists { name: String },

    /// Name cannot be used as a lock file name
    #[error("Invalid configuration name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    /// Configuration is not resolvable
    #[error("Configuration '{name}' cannot be resolved")]
    NotResolvable { name: String },

    /// Configuration already went through resolution in this build
    #[error("Configuration '{name}' has already been resolved in this build")]
    AlreadyResolved { name: String },

    /// The resolution engine failed
    #[error("Resolution of configuration '{configuration}' failed: {message}")]
    ResolutionFailed {
        configuration: String,
        message: String,
    },
}

/// Top-level dependency locking error type
#[derive(Error, Debug)]
pub enum LockingError {
    /// Lock state out of date
    #[error(transparent)]
    OutOfDate(#[from] LockOutOfDate),

    /// Lock file I/O failure
    #[error("Dependency lock I/O failure: {0}")]
    Filesystem(#[from] FilesystemError),

    /// Lock file content error
    #[error("Lock file for configuration '{configuration}' is invalid: {source}")]
    LockFile {
        configuration: String,
        source: LockFileError,
    },

    /// Configuration error
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

impl LockingError {
    /// Whether this error means the lock is stale and must be regenerated
    pub fn is_out_of_date(&self) -> bool {
        matches!(self, Self::OutOfDate(_))
    }
}
