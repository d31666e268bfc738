//! List command implementation
//!
//! Implements `deplock list` to show every configuration with a lock file.

use anyhow::{Context, Result};

use crate::cli::ProjectContext;

/// Execute the list command
pub async fn execute(context: &ProjectContext) -> Result<()> {
    let store = &context.store;
    let configurations = store
        .configurations()
        .with_context(|| format!("Failed to list {}", store.root().display()))?;

    if configurations.is_empty() {
        context.output.line(&format!(
            "No lock files found in {}",
            store.root().display()
        ));
        return Ok(());
    }

    for configuration in &configurations {
        let entries = store.read(configuration)?.len();
        println!("{configuration} ({entries} module(s))");
    }
    Ok(())
}
