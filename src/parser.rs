//! # Parameter Parsing
//!
//! Boundary between raw call input and the parsed params a handler sees. The
//! dispatcher hands every call's raw params to a [`Parser`]; whatever error
//! the parser returns is propagated by `call` unchanged.

use crate::config::DispatchConfig;
use crate::error::{DaoError, Result};
use crate::models::{Data, KeyPath};
use crate::registry::Path;
use serde_json::{Map, Value};
use tracing::debug;

/// Per-call options forwarded to the parser
pub type CallOptions = Map<String, Value>;

/// Option that disables dotted-key expansion for one call
pub const RAW_KEYS_OPTION: &str = "raw_keys";

pub trait Parser: Send + Sync {
    fn parse(&self, path: &Path, params: Value, options: &CallOptions) -> Result<Data>;
}

/// Accepts JSON objects (or `null`), enforces size limits and expands
/// dotted keys into nested objects
#[derive(Debug, Clone)]
pub struct DefaultParser {
    max_depth: usize,
    max_keys: usize,
    expand_dotted_keys: bool,
}

impl Default for DefaultParser {
    fn default() -> Self {
        Self::from_config(&DispatchConfig::default())
    }
}

impl DefaultParser {
    pub fn from_config(config: &DispatchConfig) -> Self {
        Self {
            max_depth: config.max_param_depth,
            max_keys: config.max_param_keys,
            expand_dotted_keys: config.expand_dotted_keys,
        }
    }

    fn check_limits(&self, path: &Path, value: &Value, depth: usize) -> Result<()> {
        if depth > self.max_depth {
            return Err(parse_error(
                path,
                format!("params nested too deep: {depth} (max: {})", self.max_depth),
            ));
        }

        match value {
            Value::Object(map) => {
                if map.len() > self.max_keys {
                    return Err(parse_error(
                        path,
                        format!("too many keys: {} (max: {})", map.len(), self.max_keys),
                    ));
                }
                for nested in map.values() {
                    self.check_limits(path, nested, depth + 1)?;
                }
            }
            Value::Array(items) => {
                if items.len() > self.max_keys {
                    return Err(parse_error(
                        path,
                        format!("array too large: {} items (max: {})", items.len(), self.max_keys),
                    ));
                }
                for item in items {
                    self.check_limits(path, item, depth + 1)?;
                }
            }
            _ => {}
        }

        Ok(())
    }
}

impl DefaultParser {
    /// Plain keys first, then dotted keys shallowest first, so the outcome
    /// does not depend on key order. A dotted key that would replace a value
    /// already in place is rejected.
    fn expand(&self, path: &Path, data: Data) -> Result<Data> {
        let (dotted, plain): (Vec<(String, Value)>, Vec<(String, Value)>) = data
            .into_map()
            .into_iter()
            .partition(|(key, _)| key.contains('.'));

        let mut expanded = Data::from(plain.into_iter().collect::<Map<String, Value>>());

        let mut dotted: Vec<(String, KeyPath, Value)> = dotted
            .into_iter()
            .map(|(raw, value)| {
                let key = KeyPath::parse(&raw);
                (raw, key, value)
            })
            .collect();
        dotted.sort_by_key(|(_, key, _)| key.len());

        for (raw, key, value) in dotted {
            if key.is_empty() {
                return Err(parse_error(path, format!("empty key path: {raw:?}")));
            }
            if overwrites(&expanded, &key) {
                return Err(parse_error(path, format!("conflicting values for {key}")));
            }
            if !expanded.set_bounded(&key, value, self.max_keys) {
                return Err(parse_error(
                    path,
                    format!("array index out of range in {key} (max: {} items)", self.max_keys),
                ));
            }
        }

        Ok(expanded)
    }
}

impl Parser for DefaultParser {
    fn parse(&self, path: &Path, params: Value, options: &CallOptions) -> Result<Data> {
        self.check_limits(path, &params, 0)?;

        let Some(data) = Data::from_value(params) else {
            return Err(parse_error(path, "params must be an object".to_string()));
        };

        let raw_keys = options
            .get(RAW_KEYS_OPTION)
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if !self.expand_dotted_keys || raw_keys {
            return Ok(data);
        }

        // Expansion can deepen and widen the params, so the limits run again.
        let expanded = self.expand(path, data)?.into_value();
        self.check_limits(path, &expanded, 0)?;

        let parsed = Data::from_value(expanded).unwrap_or_default();
        debug!(path = %path, keys = parsed.len(), "Params parsed");
        Ok(parsed)
    }
}

/// Whether setting `key` would replace something already present, either
/// the value at `key` itself or a non-object on the way there
fn overwrites(data: &Data, key: &KeyPath) -> bool {
    if data.has(key) {
        return true;
    }

    let segments = key.segments();
    let mut current = data.as_map().get(&segments[0]);
    for segment in &segments[1..] {
        current = match current {
            None => return false,
            Some(Value::Object(map)) => map.get(segment),
            Some(Value::Array(items)) => match segment.parse::<usize>() {
                Ok(index) => items.get(index),
                Err(_) => return true,
            },
            Some(_) => return true,
        };
    }
    false
}

fn parse_error(path: &Path, reason: String) -> DaoError {
    DaoError::Parse {
        path: path.to_string(),
        reason,
    }
}
