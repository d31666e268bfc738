//! Show command implementation
//!
//! Implements `deplock show <configuration>`.

use anyhow::{bail, Context, Result};

use crate::cli::ProjectContext;
use crate::core::lockfile;

/// Execute the show command
pub async fn execute(context: &ProjectContext, configuration: &str) -> Result<()> {
    let store = &context.store;
    if !store.contains(configuration) {
        bail!(
            "No lock file for configuration '{configuration}' in {}",
            store.root().display()
        );
    }

    let lines = store
        .read(configuration)
        .with_context(|| format!("Failed to read lock for '{configuration}'"))?;

    let mut entries = Vec::with_capacity(lines.len());
    for line in &lines {
        let entry = lockfile::split_entry(line)
            .with_context(|| format!("Lock file for '{configuration}' is invalid"))?;
        entries.push(entry);
    }

    let width = entries.iter().map(|e| e.module.len()).max().unwrap_or(0);
    for entry in &entries {
        println!("{:width$}  {}", entry.module, entry.version);
    }

    context.output.line(&format!(
        "\n{} locked module(s) in {}",
        entries.len(),
        store.path_for(configuration).display()
    ));
    Ok(())
}
