//! # Dispatch Configuration
//!
//! Defaults, `DAO_*` environment overrides and optional file loading for the
//! dispatcher, the default parser and the logging setup.

use crate::constants::{limits, DEFAULT_MISSING_PARAMETER_STATUS, ENV_PREFIX};
use crate::error::{DaoError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Status recorded by `required_parameter` unless the caller overrides it
    pub missing_parameter_status: u16,
    /// Maximum number of simultaneously active calls on one dispatcher
    pub max_call_depth: usize,
    /// Nesting limit enforced by the default parser
    pub max_param_depth: usize,
    /// Per-object and per-array size limit enforced by the default parser
    pub max_param_keys: usize,
    /// Expand `"a.b"` keys into nested objects while parsing
    pub expand_dotted_keys: bool,
    pub log_level: String,
    /// `pretty` or `json`
    pub log_format: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            missing_parameter_status: DEFAULT_MISSING_PARAMETER_STATUS,
            max_call_depth: limits::DEFAULT_MAX_CALL_DEPTH,
            max_param_depth: limits::DEFAULT_MAX_PARAM_DEPTH,
            max_param_keys: limits::DEFAULT_MAX_PARAM_KEYS,
            expand_dotted_keys: true,
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

impl DispatchConfig {
    /// Defaults overridden by `DAO_*` environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(status) = std::env::var("DAO_MISSING_PARAMETER_STATUS") {
            config.missing_parameter_status = status.parse().map_err(|e| {
                DaoError::Configuration(format!("Invalid missing_parameter_status: {e}"))
            })?;
        }

        if let Ok(depth) = std::env::var("DAO_MAX_CALL_DEPTH") {
            config.max_call_depth = depth
                .parse()
                .map_err(|e| DaoError::Configuration(format!("Invalid max_call_depth: {e}")))?;
        }

        if let Ok(depth) = std::env::var("DAO_MAX_PARAM_DEPTH") {
            config.max_param_depth = depth
                .parse()
                .map_err(|e| DaoError::Configuration(format!("Invalid max_param_depth: {e}")))?;
        }

        if let Ok(keys) = std::env::var("DAO_MAX_PARAM_KEYS") {
            config.max_param_keys = keys
                .parse()
                .map_err(|e| DaoError::Configuration(format!("Invalid max_param_keys: {e}")))?;
        }

        if let Ok(expand) = std::env::var("DAO_EXPAND_DOTTED_KEYS") {
            config.expand_dotted_keys = expand.parse().map_err(|e| {
                DaoError::Configuration(format!("Invalid expand_dotted_keys: {e}"))
            })?;
        }

        if let Ok(level) = std::env::var("DAO_LOG_LEVEL") {
            config.log_level = level;
        }

        if let Ok(format) = std::env::var("DAO_LOG_FORMAT") {
            config.log_format = format;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load from a file (any format the `config` crate recognizes by
    /// extension), layered under `DAO_*` environment variables
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading dispatch configuration");

        let config: DispatchConfig = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_call_depth == 0 {
            return Err(DaoError::Configuration(
                "max_call_depth must be greater than zero".to_string(),
            ));
        }

        if self.max_param_depth == 0 || self.max_param_keys == 0 {
            return Err(DaoError::Configuration(
                "parameter limits must be greater than zero".to_string(),
            ));
        }

        if !matches!(self.log_format.as_str(), "pretty" | "json") {
            return Err(DaoError::Configuration(format!(
                "Unknown log_format: {}",
                self.log_format
            )));
        }

        Ok(())
    }

    pub fn json_logs(&self) -> bool {
        self.log_format == "json"
    }
}
