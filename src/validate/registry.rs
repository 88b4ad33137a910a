//! Rule registry
//!
//! Maps rule names to rule functions. Built once through
//! [`RegistryBuilder`] and never mutated afterwards, so a single registry
//! can be shared across threads and validation calls without locking.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use super::errors::{RegistryError, RegistryResult, RuleError};
use super::tags::is_struct_rule;
use super::types::{Record, Schema, Value};
use crate::config::ValidatorConfig;
use crate::observability::Event;

/// A rule function: inspects a value and reports a failure, if any.
///
/// Rules must be safe to call from several threads at once.
pub type RuleFn = Arc<dyn Fn(&Value<'_>) -> Result<(), RuleError> + Send + Sync>;

/// Immutable mapping from rule name to rule function.
///
/// Cloning is cheap; clones share the same rule table.
#[derive(Clone)]
pub struct Registry {
    rules: Arc<HashMap<String, RuleFn>>,
    config: ValidatorConfig,
}

impl Registry {
    /// Starts building a registry
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Looks up a rule by name
    pub fn get(&self, name: &str) -> Option<&RuleFn> {
        self.rules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Registered rule names, sorted
    pub fn rule_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Rule names referenced by `schema` that this registry does not define.
    ///
    /// `struct` is never reported. Nested record types are not followed;
    /// check their schemas separately.
    pub fn check_schema<T>(&self, schema: &Schema<T>) -> Vec<String> {
        schema
            .rule_names()
            .into_iter()
            .filter(|name| !is_struct_rule(name) && !self.contains(name))
            .map(str::to_string)
            .collect()
    }

    /// Same as [`check_schema`](Self::check_schema) for a record type
    pub fn unknown_rules<R: Record>(&self) -> Vec<String> {
        self.check_schema(R::schema())
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("rules", &self.rule_names())
            .field("config", &self.config)
            .finish()
    }
}

/// Builder for [`Registry`].
///
/// Registration problems are remembered and reported by
/// [`build`](Self::build), so calls can be chained.
#[derive(Default)]
pub struct RegistryBuilder {
    rules: HashMap<String, RuleFn>,
    config: ValidatorConfig,
    error: Option<RegistryError>,
}

impl RegistryBuilder {
    /// Registers a rule under `name`
    pub fn rule<F>(mut self, name: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&Value<'_>) -> Result<(), RuleError> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.error.is_some() {
            return self;
        }
        if name.trim().is_empty() {
            self.error = Some(RegistryError::EmptyName);
        } else if is_struct_rule(&name) {
            self.error = Some(RegistryError::ReservedName(name));
        } else if self.rules.contains_key(&name) {
            self.error = Some(RegistryError::DuplicateRule(name));
        } else {
            self.rules.insert(name, Arc::new(rule));
        }
        self
    }

    /// Sets the validator configuration
    pub fn config(mut self, config: ValidatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Finishes the registry.
    ///
    /// # Errors
    ///
    /// Returns the first registration problem:
    /// - `RegistryError::EmptyName` for a blank rule name
    /// - `RegistryError::ReservedName` for `struct`
    /// - `RegistryError::DuplicateRule` for a name registered twice
    pub fn build(self) -> RegistryResult<Registry> {
        if let Some(err) = self.error {
            warn!(event = %Event::RegistryRejected, error = %err, "registry rejected");
            return Err(err);
        }

        debug!(
            event = %Event::RegistryBuilt,
            rules = self.rules.len(),
            max_depth = self.config.max_depth,
            "registry built"
        );

        Ok(Registry {
            rules: Arc::new(self.rules),
            config: self.config,
        })
    }
}
