//! Verify and write command implementation
//!
//! Implements `deplock verify <report>` and `deplock write <report>`: every
//! resolvable configuration of the report goes through the locking hooks,
//! several at a time. `write` requests lock writing before any
//! configuration resolves.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use futures::stream::{self, StreamExt};

use crate::cli::output::status;
use crate::cli::ProjectContext;
use crate::core::constraints::RecordingConstraintHandler;
use crate::core::plugin::DependencyLockingPlugin;
use crate::core::report::ResolutionReport;
use crate::core::resolution::LockUpdate;
use crate::core::session::LockingSession;
use crate::core::trigger::ResolutionMode;
use crate::error::LockingError;

/// Execute the verify or write command
pub async fn execute(
    context: &ProjectContext,
    report_path: &Path,
    mode: ResolutionMode,
    jobs: Option<usize>,
) -> Result<()> {
    let report = ResolutionReport::load(report_path)
        .with_context(|| format!("Failed to load {}", report_path.display()))?;
    let (mut configurations, engine) = report
        .into_parts()
        .context("Invalid resolution report")?;

    let span = tracing::info_span!("dependency_locking", %mode);
    let session = Arc::new(LockingSession::new(context.store.clone(), span));
    let constraints = Arc::new(RecordingConstraintHandler::new());
    DependencyLockingPlugin::new(Arc::clone(&session), constraints.clone())
        .apply(&mut configurations);

    if mode == ResolutionMode::Write {
        session.save_locks()?;
    }

    let names = configurations.resolvable();
    if names.is_empty() {
        context.output.line("No resolvable configurations in report.");
        return Ok(());
    }

    let jobs = jobs.unwrap_or_else(num_cpus::get).max(1);
    tracing::info!(
        "Resolving {} configuration(s) in {mode} mode, {jobs} at a time",
        names.len()
    );

    let configurations = Arc::new(configurations);
    let engine = Arc::new(engine);
    let bar = context.output.progress_bar(names.len() as u64);

    let outcomes: Vec<(String, Result<(), LockingError>)> = stream::iter(names)
        .map(|name| {
            let configurations = Arc::clone(&configurations);
            let engine = Arc::clone(&engine);
            let bar = bar.clone();
            async move {
                let task_name = name.clone();
                let outcome = tokio::task::spawn_blocking(move || {
                    configurations
                        .resolve(&task_name, engine.as_ref())
                        .map(|_| ())
                })
                .await;
                bar.set_message(name.clone());
                bar.inc(1);
                (name, outcome)
            }
        })
        .buffer_unordered(jobs)
        .map(|(name, joined)| match joined {
            Ok(outcome) => Ok((name, outcome)),
            Err(e) => Err(anyhow::anyhow!("Resolution task for '{name}' panicked: {e}")),
        })
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect::<Result<_>>()?;
    bar.finish_and_clear();

    report_outcomes(context, &session, mode, outcomes, report_path)
}

fn report_outcomes(
    context: &ProjectContext,
    session: &LockingSession,
    mode: ResolutionMode,
    mut outcomes: Vec<(String, Result<(), LockingError>)>,
    report_path: &Path,
) -> Result<()> {
    outcomes.sort_by(|a, b| a.0.cmp(&b.0));
    let written = session.written();

    let mut failed = 0usize;
    let mut out_of_date = false;
    for (name, outcome) in &outcomes {
        match outcome {
            Ok(()) => match written.get(name) {
                Some(update) => {
                    context
                        .output
                        .status(status::SUCCESS, &format!("{name}: {}", summarize(update)));
                    if context.output.is_verbose() {
                        print_update(context, update);
                    }
                }
                None => context
                    .output
                    .status(status::SUCCESS, &format!("{name}: matches lock")),
            },
            Err(e) => {
                failed += 1;
                out_of_date |= e.is_out_of_date();
                eprintln!("{} {name}: {e}", status::ERROR);
            }
        }
    }

    if failed > 0 {
        if out_of_date && mode == ResolutionMode::Validate {
            eprintln!(
                "\n{} Run 'deplock write {}' to update the lock files.",
                status::INFO,
                report_path.display()
            );
        }
        bail!("{failed} configuration(s) failed dependency locking");
    }
    Ok(())
}

fn summarize(update: &LockUpdate) -> String {
    if update.is_empty() {
        "lock unchanged".to_string()
    } else {
        format!(
            "lock updated ({} added, {} removed, {} changed)",
            update.added.len(),
            update.removed.len(),
            update.changed.len()
        )
    }
}

fn print_update(context: &ProjectContext, update: &LockUpdate) {
    for entry in &update.added {
        context.output.line(&format!("    + {entry}"));
    }
    for entry in &update.removed {
        context.output.line(&format!("    - {entry}"));
    }
    for change in &update.changed {
        context.output.line(&format!(
            "    ~ {}: {} → {}",
            change.module, change.from, change.to
        ));
    }
}
