//! Lock file codec
//!
//! A lock file records the exact versions one configuration resolved to,
//! one `group:name:version` line per module, preceded by a comment header.
//! Comment lines (`#`) and blank lines are presentation only and are dropped
//! on read.

use std::collections::BTreeMap;
use std::fmt;

use crate::core::coordinate::SEPARATOR;
use crate::error::LockFileError;

/// Prefix of comment lines
pub const COMMENT_PREFIX: char = '#';

/// A single `module:version` lock line, split at its last `:`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct LockEntry {
    /// `group:name` notation
    pub module: String,
    /// Recorded version
    pub version: String,
}

impl LockEntry {
    /// Create an entry from a module notation and a version
    pub fn new(module: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for LockEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.module, self.version)
    }
}

/// Build the three-line comment header for a lock file
pub fn header(tool: &str) -> String {
    format!(
        "# This is a {tool} generated file for dependency locking.\n\
         # Manual edits can break the build and are not advised.\n\
         # This file is expected to be part of source control.\n"
    )
}

/// Extract the entry lines of a lock file
///
/// Drops blank lines and comment lines. Remaining lines are returned as-is,
/// in file order.
pub fn parse(content: &str) -> Vec<String> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.starts_with(COMMENT_PREFIX))
        .map(str::to_string)
        .collect()
}

/// Split a lock line into module and version
///
/// The version is everything after the last `:`, the module everything
/// before it. Group and name are assumed not to contain `:`.
pub fn split_entry(line: &str) -> Result<LockEntry, LockFileError> {
    let malformed = |reason| LockFileError::MalformedEntry {
        line: line.to_string(),
        reason,
    };

    let (module, version) = line
        .rsplit_once(SEPARATOR)
        .ok_or_else(|| malformed("expected 'group:name:version'"))?;

    if module.is_empty() {
        return Err(malformed("module coordinate is empty"));
    }
    if version.is_empty() {
        return Err(malformed("version is empty"));
    }

    Ok(LockEntry::new(module, version))
}

/// Check that a version survives a write and read of its lock line
///
/// The version is split off at the last `:` and each line is one entry, so
/// it must be non-empty and contain neither `:` nor a line break.
pub fn validate_version(version: &str) -> Result<(), LockFileError> {
    let reason = if version.is_empty() {
        Some("version must not be empty")
    } else if version.contains(SEPARATOR) {
        Some("version must not contain ':'")
    } else if version.contains(['\r', '\n']) {
        Some("version must not contain line breaks")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(LockFileError::InvalidVersion {
            version: version.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Check that a module/version pair serializes to a line [`split_entry`]
/// reads back unchanged
pub fn check_entry(module: &str, version: &str) -> Result<(), LockFileError> {
    let line = || format!("{module}{SEPARATOR}{version}");
    if module.is_empty() {
        return Err(LockFileError::MalformedEntry {
            line: line(),
            reason: "module coordinate is empty",
        });
    }
    if module.starts_with(COMMENT_PREFIX) || module.contains(['\r', '\n']) {
        return Err(LockFileError::MalformedEntry {
            line: line(),
            reason: "module coordinate would not read back as one entry",
        });
    }
    validate_version(version)
}

/// Parse and split every entry line
pub fn parse_entries(content: &str) -> Result<Vec<LockEntry>, LockFileError> {
    parse(content).iter().map(|line| split_entry(line)).collect()
}

/// Serialize a module map under the given header
///
/// Entries come out in ascending module order, one per line, each line
/// terminated by `\n`.
pub fn serialize(header: &str, modules: &BTreeMap<String, String>) -> String {
    let mut content = String::from(header);
    for (module, version) in modules {
        content.push_str(module);
        content.push(SEPARATOR);
        content.push_str(version);
        content.push('\n');
    }
    content
}
