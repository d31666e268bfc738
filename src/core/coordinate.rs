//! Module coordinates
//!
//! A module coordinate `(group, name)` identifies a dependency irrespective
//! of its version. Its notation is `group:name`.

use std::cmp::Ordering;
use std::fmt;

use crate::error::LockFileError;

/// Separator between coordinate parts and the version
pub const SEPARATOR: char = ':';

/// A `(group, name)` pair identifying a module
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleCoordinate {
    group: String,
    name: String,
}

impl ModuleCoordinate {
    /// Create a coordinate
    ///
    /// Rejects empty parts, parts containing `:` or line breaks, and groups
    /// that would read back as a comment line.
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Result<Self, LockFileError> {
        let group = group.into();
        let name = name.into();

        let reason = if group.is_empty() || name.is_empty() {
            Some("group and name must not be empty")
        } else if group.contains(SEPARATOR) || name.contains(SEPARATOR) {
            Some("group and name must not contain ':'")
        } else if group.contains(['\r', '\n']) || name.contains(['\r', '\n']) {
            Some("group and name must not contain line breaks")
        } else if group.starts_with('#') {
            Some("group must not start with '#'")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(LockFileError::InvalidCoordinate {
                group,
                name,
                reason,
            }),
            None => Ok(Self { group, name }),
        }
    }

    /// Module group
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Module name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `group:name` notation
    pub fn notation(&self) -> String {
        self.to_string()
    }

    fn notation_bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.group
            .bytes()
            .chain(std::iter::once(SEPARATOR as u8))
            .chain(self.name.bytes())
    }
}

impl fmt::Display for ModuleCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.group, self.name)
    }
}

// Ordered like the notation string, so sorted coordinates match sorted lock lines.
impl Ord for ModuleCoordinate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.notation_bytes().cmp(other.notation_bytes())
    }
}

impl PartialOrd for ModuleCoordinate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
