//! Resolution results and snapshots
//!
//! The resolution engine is external; this module only models what it hands
//! back after resolving a configuration, and reduces that to the
//! `module -> version` snapshot that locking compares and persists.

use std::collections::{BTreeMap, HashMap};

use crate::core::coordinate::ModuleCoordinate;
use crate::core::lockfile::LockEntry;
use crate::core::lockfile;
use crate::error::{ConfigurationError, LockFileError};

/// Identity of one resolved component
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentIdentity {
    /// A published module, identified by coordinate and version
    Module {
        coordinate: ModuleCoordinate,
        version: String,
    },
    /// A component built by the project itself
    Project { path: String },
    /// Any other component, e.g. a local file dependency
    Library { display_name: String },
}

impl ComponentIdentity {
    /// Module-backed identity
    ///
    /// Rejects versions that cannot be recorded in a lock file.
    pub fn module(
        coordinate: ModuleCoordinate,
        version: impl Into<String>,
    ) -> Result<Self, LockFileError> {
        let version = version.into();
        lockfile::validate_version(&version)?;
        Ok(Self::Module {
            coordinate,
            version,
        })
    }

    /// Coordinate and version, for module-backed identities only
    pub fn as_module(&self) -> Option<(&ModuleCoordinate, &str)> {
        match self {
            Self::Module {
                coordinate,
                version,
            } => Some((coordinate, version)),
            Self::Project { .. } | Self::Library { .. } => None,
        }
    }
}

/// Every component one configuration resolved to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionResult {
    components: Vec<ComponentIdentity>,
}

impl ResolutionResult {
    /// Create a result from resolved components
    pub fn new(components: Vec<ComponentIdentity>) -> Self {
        Self { components }
    }

    /// All resolved components, in engine order
    pub fn components(&self) -> &[ComponentIdentity] {
        &self.components
    }

    /// Reduce to the module snapshot
    pub fn snapshot(&self) -> ResolutionSnapshot {
        ResolutionSnapshot::from_components(&self.components)
    }
}

impl FromIterator<ComponentIdentity> for ResolutionResult {
    fn from_iter<I: IntoIterator<Item = ComponentIdentity>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Resolved `group:name -> version` map of one configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionSnapshot {
    modules: BTreeMap<String, String>,
}

impl ResolutionSnapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from resolved components
    ///
    /// Non-module components are skipped. If a coordinate is reported more
    /// than once, the later version wins.
    pub fn from_components(components: &[ComponentIdentity]) -> Self {
        let mut snapshot = Self::new();
        for (coordinate, version) in components.iter().filter_map(ComponentIdentity::as_module) {
            snapshot.insert(coordinate.notation(), version);
        }
        snapshot
    }

    /// Record a module version, replacing any previous one
    pub fn insert(&mut self, module: impl Into<String>, version: impl Into<String>) {
        self.modules.insert(module.into(), version.into());
    }

    /// Resolved version of a module
    pub fn get(&self, module: &str) -> Option<&str> {
        self.modules.get(module).map(String::as_str)
    }

    /// Number of modules
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether no module was resolved
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// The underlying sorted map
    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.modules
    }

    /// Compare this snapshot against previously locked entries
    pub fn diff(&self, locked: &[LockEntry]) -> LockUpdate {
        let previous: BTreeMap<&str, &str> = locked
            .iter()
            .map(|entry| (entry.module.as_str(), entry.version.as_str()))
            .collect();

        let mut update = LockUpdate::default();
        for (module, version) in &self.modules {
            match previous.get(module.as_str()) {
                None => update.added.push(LockEntry::new(module.clone(), version.clone())),
                Some(old) if *old != version.as_str() => update.changed.push(VersionChange {
                    module: module.clone(),
                    from: (*old).to_string(),
                    to: version.clone(),
                }),
                Some(_) => {}
            }
        }
        for (module, version) in previous {
            if !self.modules.contains_key(module) {
                update.removed.push(LockEntry::new(module, version));
            }
        }
        update
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ResolutionSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for (module, version) in iter {
            snapshot.insert(module, version);
        }
        snapshot
    }
}

/// A module whose locked version changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionChange {
    pub module: String,
    pub from: String,
    pub to: String,
}

/// Difference between a lock file and the snapshot that replaced it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockUpdate {
    /// Modules new to the lock
    pub added: Vec<LockEntry>,
    /// Modules no longer resolved
    pub removed: Vec<LockEntry>,
    /// Modules locked to a different version
    pub changed: Vec<VersionChange>,
}

impl LockUpdate {
    /// Whether the lock content is unchanged
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

/// The external resolution engine
///
/// Implementations read whatever constraints were injected for the
/// configuration from their own constraint store.
pub trait ResolutionEngine: Send + Sync {
    /// Resolve one configuration
    fn resolve(&self, configuration: &str) -> Result<ResolutionResult, ConfigurationError>;
}

/// Engine returning precomputed results, e.g. from a resolution report
#[derive(Debug, Clone, Default)]
pub struct StaticEngine {
    results: HashMap<String, ResolutionResult>,
}

impl StaticEngine {
    /// Create an engine with no results
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the result returned for a configuration
    pub fn insert(&mut self, configuration: impl Into<String>, result: ResolutionResult) {
        self.results.insert(configuration.into(), result);
    }
}

impl ResolutionEngine for StaticEngine {
    fn resolve(&self, configuration: &str) -> Result<ResolutionResult, ConfigurationError> {
        self.results
            .get(configuration)
            .cloned()
            .ok_or_else(|| ConfigurationError::ResolutionFailed {
                configuration: configuration.to_string(),
                message: "no resolution result available".to_string(),
            })
    }
}
