//! # Dispatch
//!
//! Instance-level call machinery: the [`Dispatcher`], the per-call
//! [`Context`], the early-return signal and parameter extraction.
//!
//! ## Early return
//!
//! Handlers return [`Step`]; `?` on any step propagates to the handler's own
//! dispatch boundary. [`Dispatcher::halt`] produces the early-return signal,
//! which `call` absorbs and turns into the result built so far. Because each
//! nested `call` absorbs its own signal, an early return never crosses more
//! than one call frame.
//!
//! ```rust
//! use dao_core::{Api, Dispatcher, InterfaceRegistry};
//! use serde_json::json;
//!
//! struct Accounts;
//!
//! impl Api for Accounts {
//!     fn interfaces(registry: &mut InterfaceRegistry<Self>) {
//!         registry.interface("/balance", |api| {
//!             api.set("checked", json!(true))?;
//!             if api.get("frozen")?.is_some() {
//!                 return api.halt_with(403);
//!             }
//!             api.set("balance", json!(100))?;
//!             Ok(())
//!         });
//!     }
//! }
//!
//! let mut api = Dispatcher::new(Accounts);
//! let result = api.call("/balance", json!({"frozen": true})).unwrap();
//! assert_eq!(result.status.unwrap().code, 403);
//! assert_eq!(result.data.into_value(), json!({"checked": true}));
//! ```

pub mod context;
pub mod dispatcher;
pub mod flow;
pub mod parameter;

pub use context::Context;
pub use dispatcher::Dispatcher;
pub use flow::{Interrupt, ReturnScope, Step};
pub use parameter::{OnMissing, ParameterSpec};
