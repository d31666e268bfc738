//! Project locking settings
//!
//! Reads the optional `deplock.toml` in the project directory. Every key is
//! optional; a missing file yields the defaults.
//!
//! ```toml
//! [locking]
//! directory = "gradle/dependency-locks"
//! tool_name = "Gradle"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::defaults::{LOCK_DIR, SETTINGS_FILE, TOOL_NAME};
use crate::infra::store::LockStore;

/// Settings error types
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Failed to read settings file
    #[error("Failed to read settings file '{path}': {error}")]
    ReadError { path: String, error: String },

    /// Failed to parse settings file
    #[error("Failed to parse settings file '{path}': {error}")]
    ParseError { path: String, error: String },
}

/// Locking settings of a project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockingSettings {
    /// Lock file settings
    #[serde(default)]
    pub locking: LockingSection,
}

/// `[locking]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockingSection {
    /// Lock directory, relative to the project directory unless absolute
    pub directory: Option<PathBuf>,

    /// Tool name written into lock file headers
    pub tool_name: Option<String>,
}

impl LockingSettings {
    /// Load settings from a project directory
    pub fn load(project_dir: &Path) -> Result<Self, SettingsError> {
        Self::load_from_path(&project_dir.join(SETTINGS_FILE))
    }

    /// Load settings from a specific path
    ///
    /// If the file doesn't exist, returns the defaults.
    pub fn load_from_path(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| SettingsError::ReadError {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| SettingsError::ParseError {
            path: path.display().to_string(),
            error: e.to_string(),
        })
    }

    /// Effective lock directory for a project
    ///
    /// `override_dir` (from the command line or environment) wins over the
    /// settings file. Relative paths resolve against `project_dir`.
    #[must_use]
    pub fn lock_dir(&self, project_dir: &Path, override_dir: Option<&Path>) -> PathBuf {
        let dir = override_dir
            .or(self.locking.directory.as_deref())
            .unwrap_or(Path::new(LOCK_DIR));
        project_dir.join(dir)
    }

    /// Effective tool name
    #[must_use]
    pub fn tool_name(&self) -> &str {
        self.locking.tool_name.as_deref().unwrap_or(TOOL_NAME)
    }

    /// Build the lock store these settings describe
    pub fn store(&self, project_dir: &Path, override_dir: Option<&Path>) -> LockStore {
        LockStore::with_tool_name(self.lock_dir(project_dir, override_dir), self.tool_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let settings = LockingSettings::load(temp.path()).unwrap();

        assert_eq!(settings, LockingSettings::default());
        assert_eq!(settings.tool_name(), TOOL_NAME);
        assert_eq!(
            settings.lock_dir(temp.path(), None),
            temp.path().join(LOCK_DIR)
        );
    }

    #[test]
    fn test_settings_file_values() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(SETTINGS_FILE),
            "[locking]\ndirectory = \"gradle/dependency-locks\"\ntool_name = \"Gradle\"\n",
        )
        .unwrap();

        let settings = LockingSettings::load(temp.path()).unwrap();

        assert_eq!(settings.tool_name(), "Gradle");
        assert_eq!(
            settings.lock_dir(temp.path(), None),
            temp.path().join("gradle").join("dependency-locks")
        );
    }

    #[test]
    fn test_override_wins_and_absolute_paths_are_kept() {
        let temp = TempDir::new().unwrap();
        let settings = LockingSettings {
            locking: LockingSection {
                directory: Some(PathBuf::from("from-file")),
                tool_name: None,
            },
        };
        let absolute = temp.path().join("elsewhere");

        assert_eq!(
            settings.lock_dir(Path::new("/project"), Some(Path::new("cli"))),
            PathBuf::from("/project/cli")
        );
        assert_eq!(
            settings.lock_dir(Path::new("/project"), Some(&absolute)),
            absolute
        );
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(SETTINGS_FILE), "[locking\n").unwrap();

        let err = LockingSettings::load(temp.path()).unwrap_err();
        assert!(matches!(err, SettingsError::ParseError { .. }));
    }

    #[test]
    fn test_store_uses_settings() {
        let settings = LockingSettings {
            locking: LockingSection {
                directory: None,
                tool_name: Some("Gradle".to_string()),
            },
        };
        let store = settings.store(Path::new("/project"), None);
        assert_eq!(store.root(), Path::new("/project/dependency-locks"));
    }
}
