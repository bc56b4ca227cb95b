//! # Interface Registry
//!
//! Type-level mapping from [`Path`] to [`Interface`], built once per api type
//! and shared by every dispatcher of that type.
//!
//! ## Registration
//!
//! Registration happens inside [`Api::interfaces`], which runs the first time
//! a dispatcher for the type is created. Documentation is either passed
//! explicitly with [`InterfaceRegistry::interface_with_doc`] or buffered with
//! [`InterfaceRegistry::description`] / [`InterfaceRegistry::doc`] right
//! before the [`InterfaceRegistry::interface`] it belongs to.
//!
//! ```rust
//! use dao_core::{Api, Dispatcher, InterfaceRegistry};
//! use serde_json::json;
//!
//! struct Users;
//!
//! impl Api for Users {
//!     fn interfaces(registry: &mut InterfaceRegistry<Self>) {
//!         registry.description("list users");
//!         registry.interface("/users", |api| {
//!             api.set("users", json!(["ada", "grace"]))?;
//!             Ok(())
//!         });
//!     }
//! }
//!
//! let mut api = Dispatcher::new(Users);
//! let result = api.call("/users", json!({})).unwrap();
//! assert_eq!(result.data.get("users"), Some(&json!(["ada", "grace"])));
//!
//! let index = Dispatcher::<Users>::registry().index();
//! assert_eq!(index["/users"], json!({"description": "list users"}));
//! ```

pub mod interface;
pub mod path;
pub mod table;

pub use interface::{unindent, Doc, Handler, Interface};
pub use path::Path;
pub use table::registry_for;

use crate::api::Api;
use crate::constants::HANDLER_SUFFIX;
use crate::dispatch::{Dispatcher, Step};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct InterfaceRegistry<A: Api> {
    interfaces: HashMap<Path, Arc<Interface<A>>>,
    /// Handlers keyed by their internal identifier
    handlers: HashMap<Path, Handler<A>>,
    /// First-registration order, for the index listing
    order: Vec<Path>,
    pending_doc: Option<Doc>,
}

impl<A: Api> Default for InterfaceRegistry<A> {
    fn default() -> Self {
        Self {
            interfaces: HashMap::new(),
            handlers: HashMap::new(),
            order: Vec::new(),
            pending_doc: None,
        }
    }
}

impl<A: Api> InterfaceRegistry<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `path`, consuming the pending doc if one was
    /// declared. Registering the same path again replaces the earlier
    /// interface.
    pub fn interface<F>(&mut self, path: &str, handler: F) -> Arc<Interface<A>>
    where
        F: Fn(&mut Dispatcher<A>) -> Step + Send + Sync + 'static,
    {
        let doc = self.pending_doc.take();
        self.insert(Path::new(path), Arc::new(handler), doc)
    }

    /// Register with explicit documentation; any pending doc is left alone
    pub fn interface_with_doc<F>(
        &mut self,
        path: &str,
        doc: Option<Doc>,
        handler: F,
    ) -> Arc<Interface<A>>
    where
        F: Fn(&mut Dispatcher<A>) -> Step + Send + Sync + 'static,
    {
        self.insert(Path::new(path), Arc::new(handler), doc)
    }

    fn insert(&mut self, path: Path, handler: Handler<A>, doc: Option<Doc>) -> Arc<Interface<A>> {
        let handler_id = &path + HANDLER_SUFFIX;
        let interface = Arc::new(Interface::new(
            path.clone(),
            handler_id.clone(),
            Arc::clone(&handler),
            doc,
        ));

        if self.interfaces.contains_key(&path) {
            warn!(api = interface.api, path = %path, "Interface already registered, replacing");
        } else {
            self.order.push(path.clone());
        }

        debug!(api = interface.api, path = %path, handler_id = %handler_id, "Registering interface");

        self.handlers.insert(handler_id, handler);
        self.interfaces.insert(path, Arc::clone(&interface));
        interface
    }

    /// Set the pending doc's description (un-indented). Must precede the
    /// `interface` call it documents.
    pub fn description(&mut self, text: &str) -> &Doc {
        let description = unindent(text);
        self.doc(std::iter::empty::<&str>(), Map::from_iter([(
            "description".to_string(),
            Value::String(description),
        )]))
    }

    pub fn desc(&mut self, text: &str) -> &Doc {
        self.description(text)
    }

    /// Merge into the pending doc. Without keyed options the positional
    /// arguments are joined with spaces and used as the description.
    pub fn doc<I, S>(&mut self, args: I, mut options: Map<String, Value>) -> &Doc
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if options.is_empty() {
            let text = args
                .into_iter()
                .map(|arg| arg.as_ref().to_string())
                .collect::<Vec<_>>()
                .join(" ");
            options.insert("description".to_string(), Value::String(text));
        }
        let doc = self.pending_doc.get_or_insert_with(Doc::new);
        doc.merge(options);
        doc
    }

    pub fn pending_doc(&self) -> Option<&Doc> {
        self.pending_doc.as_ref()
    }

    /// Drop a doc that no interface claimed
    pub(crate) fn finish(&mut self) {
        if let Some(doc) = self.pending_doc.take() {
            warn!(
                api = std::any::type_name::<A>(),
                description = ?doc.description,
                "Documentation declared without a following interface, ignoring"
            );
        }
    }

    pub fn get(&self, path: &Path) -> Option<&Arc<Interface<A>>> {
        self.interfaces.get(path)
    }

    /// Look up a handler by its internal identifier (`/users/interface`)
    pub fn handler(&self, handler_id: &Path) -> Option<Handler<A>> {
        self.handlers.get(handler_id).cloned()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.interfaces.contains_key(path)
    }

    /// Registered paths in first-registration order
    pub fn paths(&self) -> &[Path] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Interface<A>>> {
        self.order.iter().filter_map(|path| self.interfaces.get(path))
    }

    /// Path -> doc listing, recomputed on every call
    pub fn index(&self) -> Map<String, Value> {
        self.iter()
            .map(|interface| (interface.path.to_string(), interface.index_entry()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.interfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }
}
