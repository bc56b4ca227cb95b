//! # Interface Records
//!
//! Immutable record of one registered handler plus the documentation that
//! was declared for it.

use crate::api::Api;
use crate::dispatch::{Dispatcher, Step};
use crate::registry::Path;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Capability invoked with the dispatcher whose top context is the call
pub type Handler<A> = Arc<dyn Fn(&mut Dispatcher<A>) -> Step + Send + Sync>;

/// Description metadata attached to an interface
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Doc {
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Doc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Doc holding an un-indented description
    pub fn description(text: &str) -> Self {
        Self {
            description: Some(unindent(text)),
            extra: Map::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.merge(Map::from_iter([(key.into(), value)]));
        self
    }

    /// Merge keyed options; a `description` key replaces the description
    pub fn merge(&mut self, options: Map<String, Value>) {
        for (key, value) in options {
            if key == "description" {
                self.description = match value {
                    Value::Null => None,
                    Value::String(text) => Some(text),
                    other => Some(other.to_string()),
                };
            } else {
                self.extra.insert(key, value);
            }
        }
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

pub struct Interface<A: Api> {
    /// Owning api type
    pub api: &'static str,
    pub path: Path,
    /// Internal handler identifier, `path + "/interface"`
    pub handler_id: Path,
    pub doc: Option<Doc>,
    handler: Handler<A>,
    _api: PhantomData<fn() -> A>,
}

impl<A: Api> Interface<A> {
    pub(crate) fn new(path: Path, handler_id: Path, handler: Handler<A>, doc: Option<Doc>) -> Self {
        Self {
            api: std::any::type_name::<A>(),
            path,
            handler_id,
            doc,
            handler,
            _api: PhantomData,
        }
    }

    pub fn handler(&self) -> Handler<A> {
        Arc::clone(&self.handler)
    }

    /// Index entry: the doc, or the path itself as description
    pub fn index_entry(&self) -> Value {
        match &self.doc {
            Some(doc) => doc.to_value(),
            None => serde_json::json!({ "description": self.path.to_string() }),
        }
    }
}

impl<A: Api> fmt::Debug for Interface<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interface")
            .field("api", &self.api)
            .field("path", &self.path)
            .field("handler_id", &self.handler_id)
            .field("doc", &self.doc)
            .finish_non_exhaustive()
    }
}

/// Strip the indentation shared by all non-blank lines and trim
/// surrounding blank lines
pub fn unindent(text: &str) -> String {
    let indent = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    text.lines()
        .map(|line| line.get(indent..).unwrap_or_else(|| line.trim_start()))
        .collect::<Vec<_>>()
        .join("\n")
        .trim_matches('\n')
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unindent() {
        let text = "
            list users

              paged by `page`
        ";
        assert_eq!(unindent(text), "list users\n\n  paged by `page`");
        assert_eq!(unindent("plain"), "plain");
    }

    #[test]
    fn test_doc_merge_and_serialization() {
        let mut doc = Doc::description("list users");
        doc.merge(Map::from_iter([
            ("auth".to_string(), json!(true)),
            ("description".to_string(), json!("list all users")),
        ]));

        assert_eq!(doc.to_value(), json!({"description": "list all users", "auth": true}));
        assert_eq!(Doc::new().with("x", json!(1)).to_value(), json!({"description": null, "x": 1}));
    }
}
