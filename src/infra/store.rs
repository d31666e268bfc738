//! Lock store
//!
//! Maps configuration names to lock files under one root directory. The root
//! is only created when a lock file is first written; a missing lock file
//! means no lock is recorded for that configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::defaults::{LOCK_FILE_SUFFIX, TOOL_NAME};
use crate::core::lockfile;
use crate::error::{FilesystemError, LockingError};
use crate::infra::filesystem;

/// Directory of per-configuration lock files
#[derive(Debug, Clone)]
pub struct LockStore {
    root: PathBuf,
    header: String,
}

impl LockStore {
    /// Create a store rooted at `root`, writing the default header
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_tool_name(root, TOOL_NAME)
    }

    /// Create a store whose lock file header names `tool`
    pub fn with_tool_name(root: impl Into<PathBuf>, tool: &str) -> Self {
        Self {
            root: root.into(),
            header: lockfile::header(tool),
        }
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lock file path of a configuration
    pub fn path_for(&self, configuration: &str) -> PathBuf {
        self.root.join(format!("{configuration}{LOCK_FILE_SUFFIX}"))
    }

    /// Create the root directory if needed
    pub fn ensure_root(&self) -> Result<(), FilesystemError> {
        filesystem::create_dir_all(&self.root)
    }

    /// Whether a lock file exists for a configuration
    pub fn contains(&self, configuration: &str) -> bool {
        self.path_for(configuration).is_file()
    }

    /// Read the entry lines of a configuration's lock file
    ///
    /// Returns an empty list when no lock file exists.
    pub fn read(&self, configuration: &str) -> Result<Vec<String>, FilesystemError> {
        let path = self.path_for(configuration);
        let lines = filesystem::read_optional(&path)?
            .map(|content| lockfile::parse(&content))
            .unwrap_or_default();

        tracing::debug!(
            "Read {} lock entries from {}",
            lines.len(),
            path.display()
        );
        Ok(lines)
    }

    /// Replace a configuration's lock file with `modules`
    ///
    /// Every entry must read back unchanged; otherwise nothing is written.
    pub fn write(
        &self,
        configuration: &str,
        modules: &BTreeMap<String, String>,
    ) -> Result<(), LockingError> {
        for (module, version) in modules {
            lockfile::check_entry(module, version).map_err(|source| LockingError::LockFile {
                configuration: configuration.to_string(),
                source,
            })?;
        }

        self.ensure_root()?;
        let path = self.path_for(configuration);
        let content = lockfile::serialize(&self.header, modules);
        filesystem::write_atomic(&path, &content)?;

        tracing::debug!("Wrote {} lock entries to {}", modules.len(), path.display());
        Ok(())
    }

    /// Names of all configurations with a lock file, sorted
    pub fn configurations(&self) -> Result<Vec<String>, FilesystemError> {
        let files = filesystem::list_with_suffix(&self.root, LOCK_FILE_SUFFIX)?;
        Ok(files
            .iter()
            .filter_map(|path| path.file_name()?.to_str())
            .filter_map(|name| name.strip_suffix(LOCK_FILE_SUFFIX))
            .map(str::to_string)
            .collect())
    }
}
