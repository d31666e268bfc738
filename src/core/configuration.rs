//! Resolvable configurations
//!
//! A minimal model of the host build tool's configuration graph: named
//! configurations carrying before/after resolution actions, resolved once per
//! build by an external [`ResolutionEngine`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use crate::core::hooks::{AfterResolveAction, BeforeResolveAction};
use crate::core::resolution::{ResolutionEngine, ResolutionResult};
use crate::error::{ConfigurationError, LockingError};

/// Where a configuration is in its single pass through resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionState {
    NotStarted,
    PreResolve,
    Resolving,
    PostResolve,
    Done,
    Failed,
}

impl fmt::Display for ResolutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotStarted => "not started",
            Self::PreResolve => "pre-resolve",
            Self::Resolving => "resolving",
            Self::PostResolve => "post-resolve",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A named group of dependency requirements
pub struct Configuration {
    name: String,
    can_be_resolved: bool,
    before_resolve: Vec<Arc<dyn BeforeResolveAction>>,
    after_resolve: Vec<Arc<dyn AfterResolveAction>>,
    state: Mutex<ResolutionState>,
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("name", &self.name)
            .field("can_be_resolved", &self.can_be_resolved)
            .field("before_resolve", &self.before_resolve.len())
            .field("after_resolve", &self.after_resolve.len())
            .field("state", &self.state())
            .finish()
    }
}

impl Configuration {
    fn new(name: &str, can_be_resolved: bool) -> Result<Self, ConfigurationError> {
        validate_name(name)?;
        Ok(Self {
            name: name.to_string(),
            can_be_resolved,
            before_resolve: Vec::new(),
            after_resolve: Vec::new(),
            state: Mutex::new(ResolutionState::NotStarted),
        })
    }

    /// Configuration name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this configuration is ever resolved
    pub fn can_be_resolved(&self) -> bool {
        self.can_be_resolved
    }

    /// Register an action to run before resolution
    pub fn before_resolve(&mut self, action: Arc<dyn BeforeResolveAction>) {
        self.before_resolve.push(action);
    }

    /// Register an action to run after resolution
    pub fn after_resolve(&mut self, action: Arc<dyn AfterResolveAction>) {
        self.after_resolve.push(action);
    }

    /// Current resolution state
    pub fn state(&self) -> ResolutionState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Resolve this configuration through its actions and `engine`
    ///
    /// Runs every before action, the engine, then every after action. A
    /// configuration resolves at most once per build; any failure leaves it
    /// in [`ResolutionState::Failed`].
    pub fn resolve(&self, engine: &dyn ResolutionEngine) -> Result<ResolutionResult, LockingError> {
        if !self.can_be_resolved {
            return Err(ConfigurationError::NotResolvable {
                name: self.name.clone(),
            }
            .into());
        }

        self.start()?;
        let outcome = self.run(engine);
        self.set_state(if outcome.is_ok() {
            ResolutionState::Done
        } else {
            ResolutionState::Failed
        });
        outcome
    }

    fn start(&self) -> Result<(), ConfigurationError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state != ResolutionState::NotStarted {
            return Err(ConfigurationError::AlreadyResolved {
                name: self.name.clone(),
            });
        }
        *state = ResolutionState::PreResolve;
        Ok(())
    }

    fn run(&self, engine: &dyn ResolutionEngine) -> Result<ResolutionResult, LockingError> {
        for action in &self.before_resolve {
            action.execute(&self.name)?;
        }

        self.set_state(ResolutionState::Resolving);
        let result = engine.resolve(&self.name)?;

        self.set_state(ResolutionState::PostResolve);
        for action in &self.after_resolve {
            action.execute(&self.name, &result)?;
        }
        Ok(result)
    }

    fn set_state(&self, next: ResolutionState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = next;
    }
}

/// Configuration names become lock file names
fn validate_name(name: &str) -> Result<(), ConfigurationError> {
    let reason = if name.is_empty() {
        Some("name must not be empty")
    } else if name.contains(['/', '\\']) {
        Some("name must not contain path separators")
    } else if name == "." || name == ".." {
        Some("name must not be a relative path component")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ConfigurationError::InvalidName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

type ConfigureAction = Box<dyn Fn(&mut Configuration) + Send + Sync>;

/// All configurations of a project
///
/// Actions registered with [`ConfigurationContainer::configure_each`] apply
/// to existing configurations and to every configuration added later.
#[derive(Default)]
pub struct ConfigurationContainer {
    configurations: BTreeMap<String, Configuration>,
    rules: Vec<ConfigureAction>,
}

impl fmt::Debug for ConfigurationContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigurationContainer")
            .field("configurations", &self.configurations)
            .field("rules", &self.rules.len())
            .finish()
    }
}

impl ConfigurationContainer {
    /// Create an empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a configuration
    pub fn add(
        &mut self,
        name: &str,
        can_be_resolved: bool,
    ) -> Result<&Configuration, ConfigurationError> {
        if self.configurations.contains_key(name) {
            return Err(ConfigurationError::AlreadyExists {
                name: name.to_string(),
            });
        }

        let mut configuration = Configuration::new(name, can_be_resolved)?;
        for rule in &self.rules {
            rule(&mut configuration);
        }
        Ok(self
            .configurations
            .entry(name.to_string())
            .or_insert(configuration))
    }

    /// Apply `action` to every current and future configuration
    pub fn configure_each<F>(&mut self, action: F)
    where
        F: Fn(&mut Configuration) + Send + Sync + 'static,
    {
        for configuration in self.configurations.values_mut() {
            action(configuration);
        }
        self.rules.push(Box::new(action));
    }

    /// Look up a configuration
    pub fn get(&self, name: &str) -> Result<&Configuration, ConfigurationError> {
        self.configurations
            .get(name)
            .ok_or_else(|| ConfigurationError::NotFound {
                name: name.to_string(),
            })
    }

    /// Configuration names, sorted
    pub fn names(&self) -> Vec<String> {
        self.configurations.keys().cloned().collect()
    }

    /// Resolvable configuration names, sorted
    pub fn resolvable(&self) -> Vec<String> {
        self.configurations
            .values()
            .filter(|c| c.can_be_resolved)
            .map(|c| c.name.clone())
            .collect()
    }

    /// Resolve one configuration
    pub fn resolve(
        &self,
        name: &str,
        engine: &dyn ResolutionEngine,
    ) -> Result<ResolutionResult, LockingError> {
        self.get(name)?.resolve(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::MIN_PROPTEST_ITERATIONS;
    use crate::core::resolution::StaticEngine;
    use crate::test_utils::generators::configuration_name;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counting {
        before: AtomicUsize,
        after: AtomicUsize,
    }

    impl BeforeResolveAction for Counting {
        fn execute(&self, _configuration: &str) -> Result<(), LockingError> {
            self.before.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    impl AfterResolveAction for Counting {
        fn execute(&self, _configuration: &str, _result: &ResolutionResult) -> Result<(), LockingError> {
            self.after.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Failing;

    impl BeforeResolveAction for Failing {
        fn execute(&self, configuration: &str) -> Result<(), LockingError> {
            Err(ConfigurationError::ResolutionFailed {
                configuration: configuration.to_string(),
                message: "boom".to_string(),
            }
            .into())
        }
    }

    fn engine_for(names: &[&str]) -> StaticEngine {
        let mut engine = StaticEngine::new();
        for name in names {
            engine.insert(*name, ResolutionResult::default());
        }
        engine
    }

    #[test]
    fn test_resolve_runs_actions_in_order_once() {
        let counting = Arc::new(Counting::default());
        let mut container = ConfigurationContainer::new();
        let action = counting.clone();
        container.configure_each(move |c| {
            c.before_resolve(action.clone());
            c.after_resolve(action.clone());
        });
        container.add("compile", true).unwrap();

        container.resolve("compile", &engine_for(&["compile"])).unwrap();

        assert_eq!(counting.before.load(Ordering::SeqCst), 1);
        assert_eq!(counting.after.load(Ordering::SeqCst), 1);
        assert_eq!(container.get("compile").unwrap().state(), ResolutionState::Done);
    }

    #[test]
    fn test_configure_each_applies_to_existing_configurations() {
        let counting = Arc::new(Counting::default());
        let mut container = ConfigurationContainer::new();
        container.add("compile", true).unwrap();
        let action = counting.clone();
        container.configure_each(move |c| c.before_resolve(action.clone()));

        container.resolve("compile", &engine_for(&["compile"])).unwrap();

        assert_eq!(counting.before.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_resolve_twice_is_rejected() {
        let mut container = ConfigurationContainer::new();
        container.add("compile", true).unwrap();
        let engine = engine_for(&["compile"]);

        container.resolve("compile", &engine).unwrap();
        let err = container.resolve("compile", &engine).unwrap_err();

        assert!(matches!(
            err,
            LockingError::Configuration(ConfigurationError::AlreadyResolved { .. })
        ));
    }

    #[test]
    fn test_failed_action_marks_configuration_failed() {
        let mut container = ConfigurationContainer::new();
        container.configure_each(|c| c.before_resolve(Arc::new(Failing)));
        container.add("compile", true).unwrap();

        assert!(container.resolve("compile", &engine_for(&["compile"])).is_err());
        assert_eq!(container.get("compile").unwrap().state(), ResolutionState::Failed);
    }

    #[test]
    fn test_unresolvable_configuration() {
        let mut container = ConfigurationContainer::new();
        container.add("api", false).unwrap();
        container.add("compile", true).unwrap();

        assert_eq!(container.resolvable(), vec!["compile"]);
        assert!(container.resolve("api", &engine_for(&["api"])).is_err());
        assert_eq!(container.get("api").unwrap().state(), ResolutionState::NotStarted);
    }

    #[test]
    fn test_invalid_and_duplicate_names() {
        let mut container = ConfigurationContainer::new();
        assert!(container.add("", true).is_err());
        assert!(container.add("../escape", true).is_err());
        assert!(container.add("..", true).is_err());
        container.add("compile", true).unwrap();
        assert_eq!(
            container.add("compile", true).unwrap_err(),
            ConfigurationError::AlreadyExists {
                name: "compile".to_string()
            }
        );
        assert_eq!(container.names(), vec!["compile"]);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(MIN_PROPTEST_ITERATIONS))]

        #[test]
        fn prop_plain_names_are_accepted_once(name in configuration_name()) {
            let mut container = ConfigurationContainer::new();
            prop_assert!(container.add(&name, true).is_ok());
            prop_assert!(container.add(&name, true).is_err());
            prop_assert_eq!(container.resolvable(), vec![name]);
        }
    }
}
