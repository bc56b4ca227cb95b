//! # Recorded Errors
//!
//! Append-only list of user-facing error messages collected during a call.
//! Entries are either global or attached to a key path of the result data.

use crate::models::data::KeyPath;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEntry {
    pub key: Option<KeyPath>,
    pub message: String,
}

impl ErrorEntry {
    /// `key message` for keyed entries, the bare message otherwise
    pub fn full_message(&self) -> String {
        match &self.key {
            Some(key) => format!("{key} {}", self.message),
            None => self.message.clone(),
        }
    }
}

impl fmt::Display for ErrorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_message())
    }
}

impl Serialize for ErrorEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ErrorEntry", 2)?;
        state.serialize_field("key", &self.key.as_ref().map(ToString::to_string))?;
        state.serialize_field("message", &self.message)?;
        state.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Errors {
    entries: Vec<ErrorEntry>,
}

impl Errors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a global message
    pub fn add(&mut self, message: impl Into<String>) {
        self.entries.push(ErrorEntry {
            key: None,
            message: message.into(),
        });
    }

    /// Record a message against a key path
    pub fn add_to(&mut self, key: impl Into<KeyPath>, message: impl Into<String>) {
        self.entries.push(ErrorEntry {
            key: Some(key.into()),
            message: message.into(),
        });
    }

    pub fn contains(&self, entry: &ErrorEntry) -> bool {
        self.entries.contains(entry)
    }

    /// Entries recorded against exactly this key
    pub fn on(&self, key: impl Into<KeyPath>) -> Vec<&ErrorEntry> {
        let key = key.into();
        self.entries
            .iter()
            .filter(|entry| entry.key.as_ref() == Some(&key))
            .collect()
    }

    pub fn full_messages(&self) -> Vec<String> {
        self.entries.iter().map(ErrorEntry::full_message).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ErrorEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
