//! Dependency locking plugin
//!
//! Wires the locking hooks into a project's configuration graph. Applying
//! the plugin registers a before and an after hook on every resolvable
//! configuration, including those declared after the plugin was applied.

use std::sync::Arc;

use tracing::Span;

use crate::core::configuration::ConfigurationContainer;
use crate::core::constraints::ConstraintHandler;
use crate::core::hooks::{AfterResolveHook, BeforeResolveHook};
use crate::core::session::LockingSession;

/// Registers dependency locking on a project's configurations
pub struct DependencyLockingPlugin {
    session: Arc<LockingSession>,
    constraints: Arc<dyn ConstraintHandler>,
}

impl DependencyLockingPlugin {
    pub fn new(session: Arc<LockingSession>, constraints: Arc<dyn ConstraintHandler>) -> Self {
        Self {
            session,
            constraints,
        }
    }

    /// Session shared by every hook this plugin registers
    pub fn session(&self) -> &Arc<LockingSession> {
        &self.session
    }

    /// Register the locking hooks on every resolvable configuration
    pub fn apply(&self, configurations: &mut ConfigurationContainer) {
        let parent = self.session.span().clone();
        tracing::info!(
            parent: &parent,
            "Applying dependency locking with lock files in {}",
            self.session.store().root().display()
        );

        let session = Arc::clone(&self.session);
        let constraints = Arc::clone(&self.constraints);
        configurations.configure_each(move |configuration| {
            if !configuration.can_be_resolved() {
                return;
            }

            let span: Span = tracing::debug_span!(
                parent: &parent,
                "configuration",
                name = %configuration.name()
            );
            tracing::debug!(parent: &span, "Adding locking hooks");
            configuration.before_resolve(Arc::new(BeforeResolveHook::new(
                Arc::clone(&session),
                Arc::clone(&constraints),
                span.clone(),
            )));
            configuration.after_resolve(Arc::new(AfterResolveHook::new(Arc::clone(&session), span)));
        });
    }
}
