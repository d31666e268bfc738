//! Constraints command implementation
//!
//! Implements `deplock constraints <configuration>...` to show what the
//! before-resolution hook would add to each configuration.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cli::output::status;
use crate::cli::ProjectContext;
use crate::core::constraints::RecordingConstraintHandler;
use crate::core::hooks::{BeforeResolveAction, BeforeResolveHook};
use crate::core::session::LockingSession;

/// Execute the constraints command
pub async fn execute(context: &ProjectContext, configurations: &[String]) -> Result<()> {
    let span = tracing::info_span!("dependency_locking");
    let session = Arc::new(LockingSession::new(context.store.clone(), span.clone()));
    let recorder = Arc::new(RecordingConstraintHandler::new());
    let hook = BeforeResolveHook::new(session, recorder.clone(), span);

    for configuration in configurations {
        hook.execute(configuration)
            .with_context(|| format!("Failed to load constraints for '{configuration}'"))?;

        let constraints = recorder.for_configuration(configuration);
        if constraints.is_empty() {
            context.output.status(
                status::INFO,
                &format!("{configuration}: no lock file, no constraints"),
            );
            continue;
        }

        // Constraints are the command's output, so they print even when quiet
        println!("{configuration}:");
        for constraint in &constraints {
            println!("  {} ({})", constraint.notation, constraint.reason);
        }
    }
    Ok(())
}
