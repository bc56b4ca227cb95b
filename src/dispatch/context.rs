//! Per-call execution context.

use crate::api::Api;
use crate::models::{CallResult, Data};
use crate::registry::Interface;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Binding of one call: the invoked interface, its parsed params and the
/// result being built. Lives on the dispatcher's call stack for exactly the
/// duration of the handler.
pub struct Context<A: Api> {
    /// Type name of the api the call was dispatched on
    pub api: &'static str,
    pub interface: Arc<Interface<A>>,
    pub params: Data,
    pub result: CallResult,
    pub call_id: Uuid,
    pub started_at: DateTime<Utc>,
}

impl<A: Api> Context<A> {
    pub fn new(interface: Arc<Interface<A>>, params: Data) -> Self {
        let result = CallResult::new(interface.path.to_string());
        Self {
            api: std::any::type_name::<A>(),
            interface,
            params,
            result,
            call_id: Uuid::new_v4(),
            started_at: Utc::now(),
        }
    }

    pub fn path(&self) -> String {
        self.interface.path.to_string()
    }

    /// Milliseconds since the call was dispatched
    pub fn elapsed_ms(&self) -> i64 {
        (Utc::now() - self.started_at).num_milliseconds()
    }
}

impl<A: Api> fmt::Debug for Context<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("api", &self.api)
            .field("path", &self.interface.path)
            .field("call_id", &self.call_id)
            .field("params", &self.params)
            .field("result", &self.result)
            .finish()
    }
}
