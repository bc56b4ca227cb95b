//! # Keyed Data
//!
//! Ordered key-value mapping addressed by dotted key paths. Used both for a
//! call's parsed params and for its result data.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Multi-segment address into nested data: `"user.address.city"`.
///
/// Numeric segments index into arrays when the value at that point is an
/// array, and act as plain object keys otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            segments
                .into_iter()
                .map(Into::into)
                .filter(|segment: &String| !segment.is_empty())
                .collect(),
        )
    }

    /// Split a dotted string into segments
    pub fn parse(dotted: &str) -> Self {
        Self::new(dotted.split('.'))
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl From<&str> for KeyPath {
    fn from(dotted: &str) -> Self {
        KeyPath::parse(dotted)
    }
}

impl From<String> for KeyPath {
    fn from(dotted: String) -> Self {
        KeyPath::parse(&dotted)
    }
}

impl From<&String> for KeyPath {
    fn from(dotted: &String) -> Self {
        KeyPath::parse(dotted)
    }
}

impl From<&KeyPath> for KeyPath {
    fn from(path: &KeyPath) -> Self {
        path.clone()
    }
}

impl From<Vec<String>> for KeyPath {
    fn from(segments: Vec<String>) -> Self {
        KeyPath::new(segments)
    }
}

impl From<&[&str]> for KeyPath {
    fn from(segments: &[&str]) -> Self {
        KeyPath::new(segments.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for KeyPath {
    fn from(segments: [&str; N]) -> Self {
        KeyPath::new(segments)
    }
}

/// Ordered mapping with key-path addressing
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Data(Map<String, Value>);

impl Data {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// `null` becomes empty data; any other non-object is rejected
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            Value::Null => Some(Self::new()),
            _ => None,
        }
    }

    /// Presence check: a key holding `null` still counts as present
    pub fn has(&self, key: impl Into<KeyPath>) -> bool {
        self.get(key).is_some()
    }

    pub fn get(&self, key: impl Into<KeyPath>) -> Option<&Value> {
        let key = key.into();
        let (first, rest) = key.segments().split_first()?;
        let mut current = self.0.get(first)?;
        for segment in rest {
            current = step(current, segment)?;
        }
        Some(current)
    }

    /// Set a value, creating intermediate objects as needed. Scalars found
    /// along the way are replaced by objects. Returns `false`, leaving the
    /// data untouched, when an array index cannot be addressed.
    pub fn set(&mut self, key: impl Into<KeyPath>, value: Value) -> bool {
        self.set_bounded(key, value, usize::MAX)
    }

    /// `set` that refuses to grow any array past `max_items` elements
    pub fn set_bounded(&mut self, key: impl Into<KeyPath>, value: Value, max_items: usize) -> bool {
        let key = key.into();
        let Some((first, rest)) = key.segments().split_first() else {
            return false;
        };
        if !self.addressable(&key, max_items) {
            return false;
        }

        let mut slot = self.0.entry(first.clone()).or_insert(Value::Null);
        for segment in rest {
            slot = descend(slot, segment);
        }
        *slot = value;
        true
    }

    /// Every array met along `key` can hold the index `key` asks for
    fn addressable(&self, key: &KeyPath, max_items: usize) -> bool {
        let segments = key.segments();
        let mut current = self.0.get(&segments[0]);
        for segment in &segments[1..] {
            match current {
                Some(Value::Array(items)) => match segment.parse::<usize>() {
                    Ok(index) => match index.checked_add(1) {
                        Some(len) if len <= max_items => current = items.get(index),
                        _ => return false,
                    },
                    Err(_) => current = None,
                },
                Some(Value::Object(map)) => current = map.get(segment),
                _ => return true,
            }
        }
        true
    }

    /// Shallow overwrite with every entry of `other`
    pub fn update(&mut self, other: Map<String, Value>) {
        for (key, value) in other {
            self.0.insert(key, value);
        }
    }

    /// Deep merge that only fills in keys which are absent
    pub fn apply(&mut self, defaults: Map<String, Value>) {
        apply_defaults(&mut self.0, defaults);
    }

    pub fn replace(&mut self, other: Map<String, Value>) {
        self.0 = other;
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Data {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn step<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

/// Array length needed to address `segment` as an index
fn array_len_for(segment: &str) -> Option<usize> {
    segment.parse::<usize>().ok()?.checked_add(1)
}

fn descend<'a>(slot: &'a mut Value, segment: &str) -> &'a mut Value {
    match (slot, array_len_for(segment)) {
        (Value::Array(items), Some(len)) => {
            if items.len() < len {
                items.resize(len, Value::Null);
            }
            &mut items[len - 1]
        }
        (slot, _) => {
            if !slot.is_object() {
                *slot = Value::Null;
            }
            // Indexing a null promotes it to an object.
            &mut slot[segment]
        }
    }
}

fn apply_defaults(target: &mut Map<String, Value>, defaults: Map<String, Value>) {
    for (key, default) in defaults {
        match target.get_mut(&key) {
            None => {
                target.insert(key, default);
            }
            Some(Value::Object(existing)) => {
                if let Value::Object(nested) = default {
                    apply_defaults(existing, nested);
                }
            }
            Some(_) => {}
        }
    }
}
