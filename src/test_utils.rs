//! Test utilities for property-based testing
//!
//! This module provides generators and helpers for proptest.

#[cfg(test)]
pub mod generators {
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    /// Generate a module group (dotted lowercase segments)
    pub fn group() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9]{0,8}(\\.[a-z][a-z0-9]{0,8}){0,3}"
    }

    /// Generate a module name (lowercase alphanumeric with hyphens)
    pub fn module_name() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9-]{0,20}"
    }

    /// Generate a `group:name` notation
    pub fn module_notation() -> impl Strategy<Value = String> {
        (group(), module_name()).prop_map(|(group, name)| format!("{group}:{name}"))
    }

    /// Generate a version string, with an optional qualifier
    pub fn version() -> impl Strategy<Value = String> {
        (
            0u32..100,
            0u32..100,
            0u32..100,
            prop_oneof![
                Just(String::new()),
                Just("-SNAPSHOT".to_string()),
                Just("-rc1".to_string()),
            ],
        )
            .prop_map(|(major, minor, patch, qualifier)| format!("{major}.{minor}.{patch}{qualifier}"))
    }

    /// Generate a version a lock line cannot carry: empty, or containing
    /// `:` or a line break
    pub fn unrecordable_version() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(String::new()),
            (version(), "[:\r\n]", "[a-z0-9.:]{0,6}")
                .prop_map(|(head, bad, tail)| format!("{head}{bad}{tail}")),
        ]
    }

    /// Generate a resolved module map
    pub fn module_map() -> impl Strategy<Value = BTreeMap<String, String>> {
        proptest::collection::btree_map(module_notation(), version(), 0..20)
    }

    /// Generate a configuration name
    pub fn configuration_name() -> impl Strategy<Value = String> {
        "[a-z][a-zA-Z0-9]{0,20}"
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_module_notation_generator(notation in module_notation()) {
            prop_assert_eq!(notation.matches(':').count(), 1);
            prop_assert!(!notation.starts_with(':'));
            prop_assert!(!notation.ends_with(':'));
        }

        #[test]
        fn test_version_generator(version in version()) {
            prop_assert!(!version.is_empty());
            prop_assert!(!version.contains(':'));
        }

        #[test]
        fn test_unrecordable_version_generator(version in unrecordable_version()) {
            prop_assert!(version.is_empty() || version.contains([':', '\r', '\n']));
        }

        #[test]
        fn test_configuration_name_generator(name in configuration_name()) {
            prop_assert!(!name.is_empty());
            prop_assert!(name.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }
}
