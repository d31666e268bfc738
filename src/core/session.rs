//! Per-build locking session
//!
//! A session owns what all hooks of one build share: the lock store, the
//! write trigger, and the snapshots of configurations that resolved before
//! lock writing was requested.
//!
//! # Invariants
//!
//! - The trigger flips at most once, inside [`LockingSession::save_locks`].
//! - A snapshot recorded in validate mode is held until `save_locks` writes
//!   it or the session is dropped. A snapshot whose write fails stays held. The pending table is locked both while a
//!   hook decides between writing and holding, and while `save_locks` flips
//!   the trigger, so every snapshot is written exactly once after the flip.

use std::collections::BTreeMap;
use std::mem;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::Span;

use crate::core::lockfile;
use crate::core::resolution::{LockUpdate, ResolutionSnapshot};
use crate::core::trigger::{ResolutionMode, WriteTrigger};
use crate::error::LockingError;
use crate::infra::store::LockStore;

/// State shared by the locking hooks of one build
#[derive(Debug)]
pub struct LockingSession {
    store: LockStore,
    trigger: WriteTrigger,
    pending: Mutex<BTreeMap<String, ResolutionSnapshot>>,
    written: Mutex<BTreeMap<String, LockUpdate>>,
    span: Span,
}

impl LockingSession {
    /// Create a session in validate mode
    pub fn new(store: LockStore, span: Span) -> Self {
        Self::with_trigger(store, WriteTrigger::new(), span)
    }

    /// Create a session whose mode is fixed before any resolution starts
    pub fn with_mode(store: LockStore, mode: ResolutionMode, span: Span) -> Self {
        Self::with_trigger(store, WriteTrigger::with_mode(mode), span)
    }

    /// Create a session around an existing trigger
    pub fn with_trigger(store: LockStore, trigger: WriteTrigger, span: Span) -> Self {
        Self {
            store,
            trigger,
            pending: Mutex::new(BTreeMap::new()),
            written: Mutex::new(BTreeMap::new()),
            span,
        }
    }

    /// Lock store
    pub fn store(&self) -> &LockStore {
        &self.store
    }

    /// Current mode
    pub fn mode(&self) -> ResolutionMode {
        self.trigger.mode()
    }

    /// Logging span of this session
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Request lock writing for the rest of the build
    ///
    /// Snapshots of configurations that already resolved in validate mode are
    /// written now. Returns the number of lock files written by this call.
    ///
    /// Every held snapshot is attempted. Those that fail to write stay
    /// pending and the first failure is returned; calling again retries
    /// them. Once nothing is pending, calling again has no effect.
    pub fn save_locks(&self) -> Result<usize, LockingError> {
        let mut pending = lock(&self.pending);
        if self.trigger.request_write() {
            tracing::info!(
                parent: &self.span,
                "Lock writing requested, flushing {} resolved configuration(s)",
                pending.len()
            );
        } else if pending.is_empty() {
            tracing::debug!(parent: &self.span, "Lock writing already requested");
            return Ok(0);
        } else {
            tracing::info!(
                parent: &self.span,
                "Retrying {} lock(s) that failed to write",
                pending.len()
            );
        }

        let held = mem::take(&mut *pending);
        let mut written = 0;
        let mut first_error = None;
        for (configuration, snapshot) in held {
            match self.persist(&configuration, &snapshot) {
                Ok(_) => written += 1,
                Err(e) => {
                    tracing::warn!(
                        parent: &self.span,
                        "Failed to write lock for '{configuration}': {e}"
                    );
                    pending.insert(configuration, snapshot);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(written),
        }
    }

    /// Hand over the snapshot of a configuration that finished resolving
    ///
    /// Writes it when lock writing is requested, holds it otherwise.
    pub fn record(
        &self,
        configuration: &str,
        snapshot: ResolutionSnapshot,
    ) -> Result<(), LockingError> {
        let mut pending = lock(&self.pending);
        if self.trigger.should_write() {
            drop(pending);
            return self.persist(configuration, &snapshot).map(|_| ());
        }

        tracing::debug!(
            parent: &self.span,
            "Holding snapshot of '{configuration}' in case lock writing is requested"
        );
        pending.insert(configuration.to_string(), snapshot);
        Ok(())
    }

    /// Replace a configuration's lock file with a snapshot
    pub fn persist(
        &self,
        configuration: &str,
        snapshot: &ResolutionSnapshot,
    ) -> Result<LockUpdate, LockingError> {
        let previous: Vec<_> = self
            .store
            .read(configuration)?
            .iter()
            .filter_map(|line| match lockfile::split_entry(line) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!(parent: &self.span, "Dropping entry from '{configuration}' lock: {e}");
                    None
                }
            })
            .collect();

        self.store.write(configuration, snapshot.as_map())?;
        let update = snapshot.diff(&previous);

        if update.is_empty() {
            tracing::info!(parent: &self.span, "Lock for '{configuration}' is unchanged");
        } else {
            tracing::info!(
                parent: &self.span,
                "Updated lock for '{configuration}': {} added, {} removed, {} changed",
                update.added.len(),
                update.removed.len(),
                update.changed.len()
            );
        }

        lock(&self.written).insert(configuration.to_string(), update.clone());
        Ok(update)
    }

    /// Lock files written so far, with what changed in each
    pub fn written(&self) -> BTreeMap<String, LockUpdate> {
        lock(&self.written).clone()
    }

    /// Configurations whose snapshot is held unwritten
    pub fn pending(&self) -> Vec<String> {
        lock(&self.pending).keys().cloned().collect()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
