//! # System Constants
//!
//! Fixed names and defaults shared by the registry and the dispatcher.

/// Route served by the synthetic index when nothing is registered there
pub const INDEX_PATH: &str = "/index";

/// Suffix appended to an interface path to form its handler identifier
pub const HANDLER_SUFFIX: &str = "interface";

/// Label pushed onto the return-scope stack for every call
pub const RESULT_SCOPE: &str = "result";

/// Default status recorded by `required_parameter` on a miss
pub const DEFAULT_MISSING_PARAMETER_STATUS: u16 = 412;

/// Suffix of the message generated for a missing parameter
pub const PARAMETER_MISSING: &str = "(parameter missing)";

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "DAO";

pub mod limits {
    pub const DEFAULT_MAX_CALL_DEPTH: usize = 64;
    pub const DEFAULT_MAX_PARAM_DEPTH: usize = 16;
    pub const DEFAULT_MAX_PARAM_KEYS: usize = 1000;
}
