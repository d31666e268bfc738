//! Resolution reports
//!
//! A resolution report is a JSON record of what a build tool resolved for
//! each configuration. It lets the locking pipeline run outside the build
//! tool: the report feeds a [`StaticEngine`] and declares the configurations.
//!
//! ```json
//! {"configurations": [{"name": "compile", "components": [
//!   {"kind": "module", "group": "org.example", "name": "lib", "version": "1.2"},
//!   {"kind": "project", "path": ":app"}]}]}
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::core::configuration::ConfigurationContainer;
use crate::core::coordinate::ModuleCoordinate;
use crate::core::resolution::{ComponentIdentity, ResolutionResult, StaticEngine};
use crate::error::{ConfigurationError, LockFileError};

/// Report loading errors
#[derive(Error, Debug)]
pub enum ReportError {
    /// Failed to read report
    #[error("Failed to read resolution report '{path}': {error}")]
    ReadError { path: String, error: String },

    /// Failed to parse report
    #[error("Failed to parse resolution report: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Invalid module coordinate in report
    #[error("Invalid component in configuration '{configuration}': {source}")]
    InvalidComponent {
        configuration: String,
        source: LockFileError,
    },

    /// Invalid configuration in report
    #[error("Invalid configuration in resolution report: {0}")]
    Configuration(#[from] ConfigurationError),
}

/// Resolution report root
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionReport {
    /// Reported configurations
    #[serde(default)]
    pub configurations: Vec<ReportedConfiguration>,
}

/// One configuration in a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportedConfiguration {
    /// Configuration name
    pub name: String,

    /// Whether the configuration is resolvable
    #[serde(default = "default_true")]
    pub can_be_resolved: bool,

    /// Resolved components
    #[serde(default)]
    pub components: Vec<ReportedComponent>,
}

fn default_true() -> bool {
    true
}

/// One resolved component in a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ReportedComponent {
    /// Published module
    Module {
        group: String,
        name: String,
        version: String,
    },
    /// Project component
    Project { path: String },
    /// Anything else
    Library { display_name: String },
}

impl ReportedComponent {
    fn into_identity(self) -> Result<ComponentIdentity, LockFileError> {
        Ok(match self {
            Self::Module {
                group,
                name,
                version,
            } => ComponentIdentity::module(ModuleCoordinate::new(group, name)?, version)?,
            Self::Project { path } => ComponentIdentity::Project { path },
            Self::Library { display_name } => ComponentIdentity::Library { display_name },
        })
    }
}

impl ResolutionReport {
    /// Parse a report from JSON
    pub fn from_json(content: &str) -> Result<Self, ReportError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a report from a file
    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let content = std::fs::read_to_string(path).map_err(|e| ReportError::ReadError {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    /// Declare the reported configurations and build the engine replaying them
    pub fn into_parts(self) -> Result<(ConfigurationContainer, StaticEngine), ReportError> {
        let mut configurations = ConfigurationContainer::new();
        let mut engine = StaticEngine::new();

        for reported in self.configurations {
            configurations.add(&reported.name, reported.can_be_resolved)?;
            let components = reported
                .components
                .into_iter()
                .map(ReportedComponent::into_identity)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|source| ReportError::InvalidComponent {
                    configuration: reported.name.clone(),
                    source,
                })?;
            engine.insert(reported.name, ResolutionResult::new(components));
        }

        Ok((configurations, engine))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::resolution::ResolutionEngine;

    const REPORT: &str = r#"{
        "configurations": [
            {
                "name": "compile",
                "components": [
                    {"kind": "project", "path": ":app"},
                    {"kind": "module", "group": "org.example", "name": "lib", "version": "1.2"},
                    {"kind": "library", "display_name": "libs/local.jar"}
                ]
            },
            {"name": "api", "can_be_resolved": false}
        ]
    }"#;

    #[test]
    fn test_parse_report() {
        let report = ResolutionReport::from_json(REPORT).unwrap();

        assert_eq!(report.configurations.len(), 2);
        assert!(report.configurations[0].can_be_resolved);
        assert!(!report.configurations[1].can_be_resolved);
        assert_eq!(report.configurations[0].components.len(), 3);
    }

    #[test]
    fn test_into_parts() {
        let (configurations, engine) = ResolutionReport::from_json(REPORT)
            .unwrap()
            .into_parts()
            .unwrap();

        assert_eq!(configurations.names(), vec!["api", "compile"]);
        assert_eq!(configurations.resolvable(), vec!["compile"]);
        let snapshot = engine.resolve("compile").unwrap().snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get("org.example:lib"), Some("1.2"));
    }

    #[test]
    fn test_invalid_coordinate_is_rejected() {
        let report = r#"{"configurations": [{"name": "compile", "components": [
            {"kind": "module", "group": "org:example", "name": "lib", "version": "1.2"}]}]}"#;

        let err = ResolutionReport::from_json(report)
            .unwrap()
            .into_parts()
            .unwrap_err();
        assert!(matches!(err, ReportError::InvalidComponent { .. }));
    }

    #[test]
    fn test_invalid_version_is_rejected() {
        let report = r#"{"configurations": [{"name": "compile", "components": [
            {"kind": "module", "group": "org.example", "name": "lib", "version": "1.0:beta"}]}]}"#;

        let err = ResolutionReport::from_json(report)
            .unwrap()
            .into_parts()
            .unwrap_err();
        assert!(matches!(
            err,
            ReportError::InvalidComponent {
                source: LockFileError::InvalidVersion { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_kind_is_parse_error() {
        let report = r#"{"configurations": [{"name": "compile", "components": [
            {"kind": "gem", "name": "rails"}]}]}"#;
        assert!(matches!(
            ResolutionReport::from_json(report),
            Err(ReportError::ParseError(_))
        ));
    }
}
