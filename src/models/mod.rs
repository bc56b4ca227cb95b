//! # Call Data Models
//!
//! Value types shared by the dispatcher and handlers: keyed data, status,
//! recorded errors and the per-call result.

pub mod data;
pub mod errors;
pub mod result;
pub mod status;

pub use data::{Data, KeyPath};
pub use errors::{ErrorEntry, Errors};
pub use result::CallResult;
pub use status::Status;
