//! # Dispatcher
//!
//! An api instance: the user's api value plus the per-instance call stack
//! and return-scope stack that make re-entrant dispatch work.
//!
//! ## Call lifecycle
//!
//! 1. normalize the path and resolve the interface (`/index` falls back to
//!    the synthetic listing)
//! 2. hand the raw params to the parser
//! 3. push a [`Context`] and a [`ReturnScope`]
//! 4. run the handler; an early return stops at this boundary
//! 5. pop both frames on every exit path, panics included
//! 6. hand back the context's result
//!
//! A dispatcher is single-threaded state. Share an api across threads by
//! giving each thread its own dispatcher; the registry is shared anyway.

use crate::api::Api;
use crate::config::DispatchConfig;
use crate::constants::{INDEX_PATH, RESULT_SCOPE};
use crate::dispatch::{Context, Interrupt, ReturnScope, Step};
use crate::error::{DaoError, Result};
use crate::logging::log_call_operation;
use crate::models::{CallResult, Data, Errors, KeyPath, Status};
use crate::parser::{CallOptions, DefaultParser, Parser};
use crate::registry::{registry_for, InterfaceRegistry, Path};
use serde_json::{Map, Value};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct Dispatcher<A: Api> {
    api: A,
    registry: Arc<InterfaceRegistry<A>>,
    parser: Arc<dyn Parser>,
    config: DispatchConfig,
    callstack: Vec<Context<A>>,
    catching: Vec<ReturnScope>,
}

impl<A: Api> Dispatcher<A> {
    pub fn new(api: A) -> Self {
        Self::with_config(api, DispatchConfig::default())
    }

    pub fn with_config(api: A, config: DispatchConfig) -> Self {
        Self {
            api,
            registry: registry_for::<A>(),
            parser: Arc::new(DefaultParser::from_config(&config)),
            config,
            callstack: Vec::new(),
            catching: Vec::new(),
        }
    }

    /// Replace the parser used for every subsequent call
    pub fn with_parser(mut self, parser: impl Parser + 'static) -> Self {
        self.parser = Arc::new(parser);
        self
    }

    /// The registry shared by every dispatcher of `A`
    pub fn registry() -> Arc<InterfaceRegistry<A>> {
        registry_for::<A>()
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn api_mut(&mut self) -> &mut A {
        &mut self.api
    }

    pub fn into_inner(self) -> A {
        self.api
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    pub fn interfaces(&self) -> &InterfaceRegistry<A> {
        &self.registry
    }

    /// Whether `path` names a registered interface or handler identifier
    pub fn responds_to(&self, path: &str) -> bool {
        let path = Path::new(path);
        self.registry.contains(&path) || self.registry.handler(&path).is_some()
    }

    /// Synthetic `/index` result listing every registered interface
    pub fn index(&self) -> CallResult {
        let mut result = CallResult::new(INDEX_PATH);
        result.data.update(self.registry.index());
        result
    }

    pub fn call(&mut self, path: &str, params: Value) -> Result<CallResult> {
        self.call_with(path, params, CallOptions::new())
    }

    pub fn call_with(
        &mut self,
        path: &str,
        params: Value,
        options: CallOptions,
    ) -> Result<CallResult> {
        let path = Path::new(path);

        let interface = match self.registry.get(&path) {
            Some(interface) => Arc::clone(interface),
            None if path == INDEX_PATH => return Ok(self.index()),
            None => {
                return Err(DaoError::NoSuchInterface {
                    path: path.to_string(),
                })
            }
        };

        if self.callstack.len() >= self.config.max_call_depth {
            return Err(DaoError::CallDepthExceeded {
                depth: self.callstack.len() + 1,
                max: self.config.max_call_depth,
            });
        }

        let params = self.parser.parse(&path, params, &options)?;

        let context = Context::new(Arc::clone(&interface), params);
        let call_id = context.call_id;
        let depth = self.push_frame(context);

        debug!(path = %path, call_id = %call_id, depth, "Dispatching interface call");

        let handler = interface.handler();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler(self)));
        let popped = self.pop_frame(depth);

        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(payload) => {
                warn!(path = %path, call_id = %call_id, "Handler panicked, stacks unwound");
                panic::resume_unwind(payload)
            }
        };
        let context = popped.ok_or(DaoError::NoContext)?;

        let elapsed = context.elapsed_ms();
        let (path, id) = (context.path(), call_id.to_string());
        match outcome {
            Ok(()) => log_call_operation(&path, &id, depth, "completed", elapsed),
            Err(Interrupt::Return { call_id: target }) => {
                if target != call_id {
                    warn!(path = %path, call_id = %call_id, target = %target, "Early return aimed at another call");
                }
                log_call_operation(&path, &id, depth, "returned", elapsed);
            }
            Err(Interrupt::Fail(err)) => {
                log_call_operation(&path, &id, depth, "failed", elapsed);
                return Err(err);
            }
        }

        Ok(context.result)
    }

    fn push_frame(&mut self, context: Context<A>) -> usize {
        self.catching.push(ReturnScope {
            label: RESULT_SCOPE,
            call_id: context.call_id,
        });
        self.callstack.push(context);
        self.callstack.len()
    }

    /// Pop the frame pushed at `depth`, discarding anything a misbehaving
    /// handler left above it
    fn pop_frame(&mut self, depth: usize) -> Option<Context<A>> {
        debug_assert_eq!(self.callstack.len(), depth);
        debug_assert_eq!(self.catching.len(), depth);

        self.catching.truncate(depth.saturating_sub(1));
        self.callstack.truncate(depth);
        self.callstack.pop()
    }

    pub fn context(&self) -> Result<&Context<A>> {
        self.callstack.last().ok_or(DaoError::NoContext)
    }

    pub fn context_mut(&mut self) -> Result<&mut Context<A>> {
        self.callstack.last_mut().ok_or(DaoError::NoContext)
    }

    pub fn result(&self) -> Result<&CallResult> {
        Ok(&self.context()?.result)
    }

    pub fn result_mut(&mut self) -> Result<&mut CallResult> {
        Ok(&mut self.context_mut()?.result)
    }

    pub fn params(&self) -> Result<&Data> {
        Ok(&self.context()?.params)
    }

    pub fn errors(&self) -> Result<&Errors> {
        Ok(&self.result()?.errors)
    }

    pub fn errors_mut(&mut self) -> Result<&mut Errors> {
        Ok(&mut self.result_mut()?.errors)
    }

    pub fn status(&mut self, status: impl Into<Status>) -> Result<()> {
        self.result_mut()?.set_status(status);
        Ok(())
    }

    /// Early return out of the current call. The result keeps whatever the
    /// handler recorded so far.
    pub fn halt<T>(&self) -> Step<T> {
        match self.catching.last() {
            Some(scope) => Err(Interrupt::Return {
                call_id: scope.call_id,
            }),
            None => Err(Interrupt::Fail(DaoError::NoContext)),
        }
    }

    /// Set the status, then return early
    pub fn halt_with<T>(&mut self, status: impl Into<Status>) -> Step<T> {
        self.status(status)?;
        self.halt()
    }

    /// Innermost early-return scope
    pub fn catching(&self) -> Option<&ReturnScope> {
        self.catching.last()
    }

    pub fn is_catching(&self) -> bool {
        !self.catching.is_empty()
    }

    pub fn is_catching_results(&self) -> bool {
        self.catching().is_some_and(|scope| scope.label == RESULT_SCOPE)
    }

    pub fn call_depth(&self) -> usize {
        self.callstack.len()
    }

    pub fn scope_depth(&self) -> usize {
        self.catching.len()
    }

    pub fn data(&self) -> Result<&Data> {
        Ok(&self.result()?.data)
    }

    pub fn set(&mut self, key: impl Into<KeyPath>, value: Value) -> Result<()> {
        let key = key.into();
        if self.result_mut()?.data.set(&key, value) {
            return Ok(());
        }
        Err(DaoError::Handler(format!("cannot address {key} in result data")))
    }

    /// Read from the current call's params
    pub fn get(&self, key: impl Into<KeyPath>) -> Result<Option<&Value>> {
        Ok(self.params()?.get(key))
    }

    pub fn update(&mut self, values: Map<String, Value>) -> Result<()> {
        self.result_mut()?.data.update(values);
        Ok(())
    }

    /// Fill in result data only where keys are absent
    pub fn apply(&mut self, defaults: Map<String, Value>) -> Result<()> {
        self.result_mut()?.data.apply(defaults);
        Ok(())
    }

    pub fn default(&mut self, key: impl Into<KeyPath>, value: Value) -> Result<()> {
        let key = key.into();
        if self.data()?.has(&key) {
            return Ok(());
        }
        self.set(key, value)
    }

    pub fn replace(&mut self, values: Map<String, Value>) -> Result<()> {
        self.result_mut()?.data.replace(values);
        Ok(())
    }

    /// Replace the result data, then require it to be valid
    pub fn replace_and_validate(&mut self, values: Map<String, Value>) -> Result<()> {
        self.replace(values)?;
        self.ensure_valid()
    }

    pub fn validates<F>(&mut self, key: impl Into<KeyPath>, predicate: F) -> Result<()>
    where
        F: Fn(Option<&Value>) -> bool + Send + Sync + 'static,
    {
        self.result_mut()?.validates(key, predicate);
        Ok(())
    }

    pub fn validates_presence_of(&mut self, key: impl Into<KeyPath>) -> Result<()> {
        self.result_mut()?.validations.validates_presence_of(key);
        Ok(())
    }

    pub fn validate(&mut self) -> Result<usize> {
        Ok(self.result_mut()?.validate())
    }

    pub fn is_valid(&mut self) -> Result<bool> {
        Ok(self.result_mut()?.is_valid())
    }

    pub fn ensure_valid(&mut self) -> Result<()> {
        self.result_mut()?.ensure_valid()
    }
}
