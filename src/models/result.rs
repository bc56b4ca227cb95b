//! # Call Result
//!
//! Mutable per-call output accumulator: data payload, status, recorded errors
//! and the validation rules registered while the call ran.

use crate::error::{DaoError, Result};
use crate::models::{Data, Errors, KeyPath, Status};
use crate::validation::Validations;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct CallResult {
    /// Interface path this result was produced for
    pub path: String,
    pub data: Data,
    pub status: Option<Status>,
    pub errors: Errors,
    #[serde(skip)]
    pub validations: Validations,
}

impl CallResult {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            data: Data::new(),
            status: None,
            errors: Errors::new(),
            validations: Validations::new(),
        }
    }

    pub fn set_status(&mut self, status: impl Into<Status>) {
        self.status = Some(status.into());
    }

    pub fn validates<F>(&mut self, key: impl Into<KeyPath>, predicate: F)
    where
        F: Fn(Option<&Value>) -> bool + Send + Sync + 'static,
    {
        self.validations.validates(key, predicate);
    }

    /// Evaluate every registered rule against the current data
    pub fn validate(&mut self) -> usize {
        self.validations.run(&self.data, &mut self.errors)
    }

    /// Runs validation, then reports whether any error has been recorded,
    /// including errors recorded outside of validation
    pub fn is_valid(&mut self) -> bool {
        self.validate();
        self.errors.is_empty()
    }

    pub fn ensure_valid(&mut self) -> Result<()> {
        if self.is_valid() {
            return Ok(());
        }
        Err(DaoError::Invalid {
            path: self.path.clone(),
            errors: self.errors.full_messages(),
        })
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
