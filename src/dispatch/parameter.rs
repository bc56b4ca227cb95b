//! # Parameter Extraction
//!
//! Reads a value from the current call's params, trying candidate key paths
//! in declaration order, and applies a miss policy when none is present.
//!
//! ```rust
//! use dao_core::{Api, Dispatcher, InterfaceRegistry, ParameterSpec};
//! use serde_json::json;
//!
//! struct Search;
//!
//! impl Api for Search {
//!     fn interfaces(registry: &mut InterfaceRegistry<Self>) {
//!         registry.interface("/search", |api| {
//!             let query = api.required_parameter(ParameterSpec::new("q").or("query"))?;
//!             let page = api.parameter("page.number")?.unwrap_or(json!(1));
//!             api.set("query", query.unwrap_or_default())?;
//!             api.set("page", page)?;
//!             Ok(())
//!         });
//!     }
//! }
//!
//! let mut api = Dispatcher::new(Search);
//!
//! let found = api.call("/search", json!({"query": "rust"})).unwrap();
//! assert_eq!(found.data.get("query"), Some(&json!("rust")));
//!
//! let missing = api.call("/search", json!({})).unwrap();
//! assert_eq!(missing.status.map(|s| s.code), Some(412));
//! assert_eq!(missing.errors.full_messages(), vec!["q or query (parameter missing)"]);
//! assert!(missing.data.is_empty());
//! ```

use crate::api::Api;
use crate::constants::PARAMETER_MISSING;
use crate::dispatch::{Dispatcher, Step};
use crate::error::DaoError;
use crate::models::{KeyPath, Status};
use serde_json::Value;
use tracing::debug;

/// What to record into the result's errors when no candidate is present
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OnMissing {
    /// Record nothing
    Ignore,
    /// `"<k1 or k2 ...> (parameter missing)"`
    Generated,
    Message(String),
}

/// Candidate keys plus miss policy for one parameter lookup.
///
/// Unset policy fields mean "off" for [`Dispatcher::parameter`] and take the
/// required defaults in [`Dispatcher::required_parameter`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSpec {
    keys: Vec<KeyPath>,
    on_missing: Option<OnMissing>,
    status: Option<Option<Status>>,
    return_on_miss: Option<bool>,
}

impl ParameterSpec {
    pub fn new(key: impl Into<KeyPath>) -> Self {
        Self::default().or(key)
    }

    /// Several candidates, tried in order
    pub fn keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<KeyPath>,
    {
        keys.into_iter().fold(Self::default(), |spec, key| spec.or(key))
    }

    /// Append a fallback candidate
    pub fn or(mut self, key: impl Into<KeyPath>) -> Self {
        self.keys.push(key.into());
        self
    }

    /// `true` records the generated message, `false` records nothing
    pub fn error(mut self, record: bool) -> Self {
        self.on_missing = Some(if record {
            OnMissing::Generated
        } else {
            OnMissing::Ignore
        });
        self
    }

    pub fn error_message(mut self, message: impl Into<String>) -> Self {
        self.on_missing = Some(OnMissing::Message(message.into()));
        self
    }

    pub fn status(mut self, status: impl Into<Status>) -> Self {
        self.status = Some(Some(status.into()));
        self
    }

    /// Explicitly leave the status untouched on a miss
    pub fn without_status(mut self) -> Self {
        self.status = Some(None);
        self
    }

    pub fn return_on_miss(mut self, halt: bool) -> Self {
        self.return_on_miss = Some(halt);
        self
    }

    /// Non-empty candidates in declaration order
    pub fn candidates(&self) -> Vec<&KeyPath> {
        self.keys.iter().filter(|key| !key.is_empty()).collect()
    }

    fn required(mut self, default_status: u16) -> Self {
        self.on_missing.get_or_insert(OnMissing::Generated);
        self.status.get_or_insert(Some(Status::new(default_status)));
        self.return_on_miss.get_or_insert(true);
        self
    }
}

impl From<&str> for ParameterSpec {
    fn from(key: &str) -> Self {
        ParameterSpec::new(key)
    }
}

impl From<String> for ParameterSpec {
    fn from(key: String) -> Self {
        ParameterSpec::new(key)
    }
}

impl From<KeyPath> for ParameterSpec {
    fn from(key: KeyPath) -> Self {
        ParameterSpec::new(key)
    }
}

/// An array lists alternative keys, not segments of one key
impl<const N: usize> From<[&str; N]> for ParameterSpec {
    fn from(keys: [&str; N]) -> Self {
        ParameterSpec::keys(keys)
    }
}

impl From<Vec<KeyPath>> for ParameterSpec {
    fn from(keys: Vec<KeyPath>) -> Self {
        ParameterSpec::keys(keys)
    }
}

impl<A: Api> Dispatcher<A> {
    /// Value of the first candidate present in params (`null` counts as
    /// present), or `None` after applying the miss policy
    pub fn parameter(&mut self, spec: impl Into<ParameterSpec>) -> Step<Option<Value>> {
        let spec = spec.into();
        let candidates = spec.candidates();
        if candidates.is_empty() {
            return Err(DaoError::NoKeys.into());
        }

        let params = self.params()?;
        if let Some(value) = candidates.iter().find_map(|key| params.get(*key)) {
            return Ok(Some(value.clone()));
        }

        let missed = candidates
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" or ");
        debug!(keys = %missed, "Parameter missing");

        let message = match &spec.on_missing {
            None | Some(OnMissing::Ignore) => None,
            Some(OnMissing::Generated) => Some(format!("{missed} {PARAMETER_MISSING}")),
            Some(OnMissing::Message(message)) => Some(message.clone()),
        };
        if let Some(message) = message {
            self.errors_mut()?.add(message);
        }

        if let Some(Some(status)) = &spec.status {
            self.status(status.clone())?;
        }

        if spec.return_on_miss.unwrap_or(false) {
            return self.halt();
        }

        Ok(None)
    }

    /// `parameter` defaulting to: record the generated message, set the
    /// configured missing-parameter status, return early
    pub fn required_parameter(&mut self, spec: impl Into<ParameterSpec>) -> Step<Option<Value>> {
        let status = self.config().missing_parameter_status;
        self.parameter(spec.into().required(status))
    }
}
