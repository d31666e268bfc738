//! Resolution hooks
//!
//! The before hook pins a configuration to its locked versions by injecting
//! one strict constraint per lock entry. The after hook checks the resolved
//! modules against the lock, then hands the snapshot to the session which
//! writes it once lock writing is requested.

use std::sync::Arc;

use tracing::Span;

use crate::config::defaults::CONSTRAINT_REASON;
use crate::core::constraints::{ConstraintHandler, DependencyConstraint};
use crate::core::lockfile::{self, LockEntry};
use crate::core::resolution::{ResolutionResult, ResolutionSnapshot};
use crate::core::session::LockingSession;
use crate::core::trigger::ResolutionMode;
use crate::error::{LockOutOfDate, LockingError};

/// Action run before a configuration resolves
pub trait BeforeResolveAction: Send + Sync {
    fn execute(&self, configuration: &str) -> Result<(), LockingError>;
}

/// Action run after a configuration resolved
pub trait AfterResolveAction: Send + Sync {
    fn execute(&self, configuration: &str, result: &ResolutionResult) -> Result<(), LockingError>;
}

/// Injects lock entries as constraints
pub struct BeforeResolveHook {
    session: Arc<LockingSession>,
    constraints: Arc<dyn ConstraintHandler>,
    span: Span,
}

impl BeforeResolveHook {
    pub fn new(
        session: Arc<LockingSession>,
        constraints: Arc<dyn ConstraintHandler>,
        span: Span,
    ) -> Self {
        Self {
            session,
            constraints,
            span,
        }
    }
}

impl BeforeResolveAction for BeforeResolveHook {
    fn execute(&self, configuration: &str) -> Result<(), LockingError> {
        tracing::debug!(parent: &self.span, "Pre resolve hook for {configuration}");

        let entries = locked_entries(&self.session, configuration)?;
        for entry in &entries {
            self.constraints.add_constraint(
                configuration,
                DependencyConstraint::from_entry(entry, CONSTRAINT_REASON),
            );
        }

        if !entries.is_empty() {
            tracing::info!(
                parent: &self.span,
                "Locked {configuration} to {} module version(s)",
                entries.len()
            );
        }
        Ok(())
    }
}

/// Validates resolved modules and hands the snapshot to the session
pub struct AfterResolveHook {
    session: Arc<LockingSession>,
    span: Span,
}

impl AfterResolveHook {
    pub fn new(session: Arc<LockingSession>, span: Span) -> Self {
        Self { session, span }
    }
}

impl AfterResolveAction for AfterResolveHook {
    fn execute(&self, configuration: &str, result: &ResolutionResult) -> Result<(), LockingError> {
        let snapshot = result.snapshot();
        tracing::debug!(
            parent: &self.span,
            "Post resolve hook for {configuration}, {} module(s) among {} component(s)",
            snapshot.len(),
            result.components().len()
        );

        // Read once: the trigger may flip while this hook runs.
        let mode = self.session.mode();
        if mode == ResolutionMode::Validate {
            let entries = locked_entries(&self.session, configuration)?;
            validate(configuration, &entries, &snapshot)?;
        }

        self.session.record(configuration, snapshot)
    }
}

/// Check that every locked module resolved to its locked version
///
/// Modules resolved but absent from the lock are accepted; the lock only
/// pins what it records.
pub fn validate(
    configuration: &str,
    locked: &[LockEntry],
    snapshot: &ResolutionSnapshot,
) -> Result<(), LockOutOfDate> {
    for entry in locked {
        match snapshot.get(&entry.module) {
            None => {
                return Err(LockOutOfDate::MissingModule {
                    configuration: configuration.to_string(),
                    entry: entry.to_string(),
                })
            }
            Some(version) if version != entry.version => {
                return Err(LockOutOfDate::VersionMismatch {
                    configuration: configuration.to_string(),
                    expected: entry.to_string(),
                    actual: LockEntry::new(entry.module.clone(), version).to_string(),
                })
            }
            Some(_) => {}
        }
    }
    Ok(())
}

fn locked_entries(
    session: &LockingSession,
    configuration: &str,
) -> Result<Vec<LockEntry>, LockingError> {
    session
        .store()
        .read(configuration)?
        .iter()
        .map(|line| lockfile::split_entry(line))
        .collect::<Result<_, _>>()
        .map_err(|source| LockingError::LockFile {
            configuration: configuration.to_string(),
            source,
        })
}
