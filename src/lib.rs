#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Dao Core
//!
//! In-process interface registry and dispatch engine.
//!
//! ## Overview
//!
//! An api type declares named *interfaces*: handlers keyed by a hierarchical
//! path. A [`Dispatcher`] routes calls to them and gives each handler a
//! mutable per-call context with parameter extraction, recorded errors,
//! validation and a scoped early return.
//!
//! ## Architecture
//!
//! ```text
//! Api type ── interfaces() ──> InterfaceRegistry  (one per type, shared)
//!                                      │
//! Dispatcher::call(path, params)       │ lookup
//!   ├── Parser::parse                  ▼
//!   ├── push Context + ReturnScope   Interface ── handler(&mut Dispatcher)
//!   ├── run handler (Step / halt)
//!   └── pop both, return CallResult
//! ```
//!
//! ## Module Organization
//!
//! - [`api`] - the api type contract
//! - [`registry`] - paths, interface records, per-type registries
//! - [`dispatch`] - dispatcher, call context, early return, parameters
//! - [`models`] - keyed data, status, recorded errors, call results
//! - [`validation`] - validation rules evaluated against result data
//! - [`parser`] - raw-params parsing boundary
//! - [`config`] - configuration
//! - [`error`] - structured error handling
//! - [`logging`] - structured logging setup
//!
//! ## Quick Start
//!
//! ```rust
//! use dao_core::{Api, Dispatcher, InterfaceRegistry};
//! use serde_json::json;
//!
//! struct Greeter;
//!
//! impl Api for Greeter {
//!     fn interfaces(registry: &mut InterfaceRegistry<Self>) {
//!         registry.description("say hello");
//!         registry.interface("/hello", |api| {
//!             let name = api.required_parameter("name")?.unwrap_or_default();
//!             let name = name.as_str().unwrap_or("stranger");
//!             api.set("greeting", json!(format!("hello {name}")))?;
//!             Ok(())
//!         });
//!     }
//! }
//!
//! let mut api = Dispatcher::new(Greeter);
//! let result = api.call("/hello", json!({"name": "ada"})).unwrap();
//! assert_eq!(result.data.get("greeting"), Some(&json!("hello ada")));
//!
//! let index = api.call("/index", json!({})).unwrap();
//! assert_eq!(index.data.get("/hello"), Some(&json!({"description": "say hello"})));
//! ```

pub mod api;
pub mod config;
pub mod constants;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod models;
pub mod parser;
pub mod registry;
pub mod validation;

pub use api::Api;
pub use config::DispatchConfig;
pub use dispatch::{Context, Dispatcher, Interrupt, OnMissing, ParameterSpec, ReturnScope, Step};
pub use error::{DaoError, Result};
pub use models::{CallResult, Data, ErrorEntry, Errors, KeyPath, Status};
pub use parser::{CallOptions, DefaultParser, Parser};
pub use registry::{Doc, Handler, Interface, InterfaceRegistry, Path};
pub use validation::Validations;
