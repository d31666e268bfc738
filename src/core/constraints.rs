//! Dependency constraints
//!
//! The constraint API is owned by the host build tool. Locking only needs to
//! add constraints to a configuration, so it is modelled as a single-method
//! trait.

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::core::lockfile::LockEntry;

/// A strict version constraint attached to a configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyConstraint {
    /// Full `group:name:version` notation
    pub notation: String,
    /// Human-readable reason shown by the build tool
    pub reason: String,
}

impl DependencyConstraint {
    /// Create a constraint from a lock entry
    pub fn from_entry(entry: &LockEntry, reason: &str) -> Self {
        Self {
            notation: entry.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Receives constraints injected before resolution
///
/// Called concurrently for different configurations.
pub trait ConstraintHandler: Send + Sync {
    /// Add a constraint to a configuration's dependency set
    fn add_constraint(&self, configuration: &str, constraint: DependencyConstraint);
}

/// Constraint handler that keeps everything it receives
#[derive(Debug, Default)]
pub struct RecordingConstraintHandler {
    constraints: Mutex<BTreeMap<String, Vec<DependencyConstraint>>>,
}

impl RecordingConstraintHandler {
    /// Create an empty handler
    pub fn new() -> Self {
        Self::default()
    }

    /// Constraints added to one configuration, in insertion order
    pub fn for_configuration(&self, configuration: &str) -> Vec<DependencyConstraint> {
        self.constraints
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(configuration)
            .cloned()
            .unwrap_or_default()
    }

    /// Total number of constraints across configurations
    pub fn len(&self) -> usize {
        self.constraints
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .values()
            .map(Vec::len)
            .sum()
    }

    /// Whether no constraint was added
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ConstraintHandler for RecordingConstraintHandler {
    fn add_constraint(&self, configuration: &str, constraint: DependencyConstraint) {
        self.constraints
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .entry(configuration.to_string())
            .or_default()
            .push(constraint);
    }
}
