//! Validation rules for call results
//!
//! Handlers register named predicates against key paths of their result data.
//! Running the rules records a keyed error for every predicate that fails;
//! the aggregate checks (`is_valid`, `ensure_valid`) live on
//! [`crate::models::CallResult`].

use crate::models::{Data, Errors, KeyPath};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Predicate over the value found at a rule's key (`None` when absent)
pub type Predicate = Arc<dyn Fn(Option<&Value>) -> bool + Send + Sync>;

pub const DEFAULT_INVALID_MESSAGE: &str = "is invalid";
pub const PRESENCE_MESSAGE: &str = "is required";

#[derive(Clone)]
pub struct Rule {
    pub key: KeyPath,
    pub message: String,
    predicate: Predicate,
}

impl Rule {
    pub fn check(&self, data: &Data) -> bool {
        (self.predicate)(data.get(&self.key))
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("key", &self.key)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Validations {
    rules: Vec<Rule>,
}

impl Validations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validates<F>(&mut self, key: impl Into<KeyPath>, predicate: F)
    where
        F: Fn(Option<&Value>) -> bool + Send + Sync + 'static,
    {
        self.validates_with_message(key, DEFAULT_INVALID_MESSAGE, predicate);
    }

    pub fn validates_with_message<F>(
        &mut self,
        key: impl Into<KeyPath>,
        message: impl Into<String>,
        predicate: F,
    ) where
        F: Fn(Option<&Value>) -> bool + Send + Sync + 'static,
    {
        self.rules.push(Rule {
            key: key.into(),
            message: message.into(),
            predicate: Arc::new(predicate),
        });
    }

    /// Present, non-null and not an empty string
    pub fn validates_presence_of(&mut self, key: impl Into<KeyPath>) {
        self.validates_with_message(key, PRESENCE_MESSAGE, |value| match value {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(_) => true,
        });
    }

    /// Evaluate every rule, recording failures into `errors`. An identical
    /// entry already recorded by an earlier run is not appended again.
    /// Returns the number of failing rules.
    pub fn run(&self, data: &Data, errors: &mut Errors) -> usize {
        let mut failures = 0;
        for rule in &self.rules {
            if rule.check(data) {
                continue;
            }
            failures += 1;
            let entry = crate::models::ErrorEntry {
                key: Some(rule.key.clone()),
                message: rule.message.clone(),
            };
            if !errors.contains(&entry) {
                errors.add_to(rule.key.clone(), rule.message.clone());
            }
        }
        debug!(rules = self.rules.len(), failures, "Validations evaluated");
        failures
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
