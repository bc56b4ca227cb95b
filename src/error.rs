//! # Error Types
//!
//! Crate-wide error enum. Lookup and usage failures, collaborator failures
//! (parser, validation) and handler failures all travel as `DaoError`.
//! Recorded errors (missing parameters, failed validation rules) are NOT
//! errors in this sense: they live in [`crate::models::Errors`] on the
//! call's result.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DaoError {
    /// No interface is registered under the requested path
    #[error("no such interface: {path}")]
    NoSuchInterface { path: String },

    /// Current-call accessor used while no call is executing
    #[error("no context: not inside an interface call")]
    NoContext,

    /// `parameter` was given an empty candidate key list
    #[error("no keys given for parameter lookup")]
    NoKeys,

    #[error("could not parse params for {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("invalid result for {path}: {}", errors.join(", "))]
    Invalid { path: String, errors: Vec<String> },

    #[error("call depth {depth} exceeds maximum of {max}")]
    CallDepthExceeded { depth: usize, max: usize },

    #[error("handler error: {0}")]
    Handler(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl DaoError {
    /// Whether the error is a programming error rather than a data problem
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            DaoError::NoSuchInterface { .. } | DaoError::NoContext | DaoError::NoKeys
        )
    }
}

impl From<config::ConfigError> for DaoError {
    fn from(err: config::ConfigError) -> Self {
        DaoError::Configuration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DaoError>;
