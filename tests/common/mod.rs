//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

use std::path::PathBuf;
use tempfile::TempDir;

/// Test project context
///
/// Creates a temporary directory for test projects and provides
/// utilities for setting up test scenarios.
pub struct TestProject {
    /// Temporary directory for the test project
    pub dir: TempDir,
}

impl TestProject {
    /// Create a new test project in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the test project directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Default lock directory of the project
    #[allow(dead_code)]
    pub fn lock_dir(&self) -> PathBuf {
        self.path().join("dependency-locks")
    }

    /// Create a file in the test project
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Write a lock file for a configuration in the default lock directory
    #[allow(dead_code)]
    pub fn create_lock(&self, configuration: &str, lines: &[&str]) {
        let mut content = String::from(LOCK_HEADER);
        for line in lines {
            content.push_str(line);
            content.push('\n');
        }
        self.create_file(
            &format!("dependency-locks/{configuration}.lockfile"),
            &content,
        );
    }

    /// Check if a file exists in the test project
    #[allow(dead_code)]
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Read a file from the test project
    #[allow(dead_code)]
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(name)).expect("Failed to read file")
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Header written by deplock with the default tool name
#[allow(dead_code)]
pub const LOCK_HEADER: &str = "# This is a deplock generated file for dependency locking.
# Manual edits can break the build and are not advised.
# This file is expected to be part of source control.
";

/// Resolution report for the `compile` scenario, parameterized by version
#[allow(dead_code)]
pub fn compile_report(version: &str) -> String {
    format!(
        r#"{{
  "configurations": [
    {{
      "name": "compile",
      "components": [
        {{"kind": "project", "path": ":app"}},
        {{"kind": "module", "group": "org.example", "name": "lib", "version": "{version}"}}
      ]
    }},
    {{"name": "api", "can_be_resolved": false}}
  ]
}}"#
    )
}
