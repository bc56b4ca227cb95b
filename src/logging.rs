//! # Structured Logging Module
//!
//! Environment-aware structured logging for dispatch tracing. Console output,
//! plain or JSON, filtered by the configured level.

use crate::config::DispatchConfig;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging once per process
pub fn init_structured_logging(config: &DispatchConfig) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let log_level = get_log_level(&environment, config);

        let layer = if config.json_logs() {
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(false)
                .json()
                .with_filter(EnvFilter::new(log_level.clone()))
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_filter(EnvFilter::new(log_level.clone()))
                .boxed()
        };

        // A host application may already own the global subscriber.
        if tracing_subscriber::registry().with(layer).try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized - continuing");
        }

        tracing::info!(
            environment = %environment,
            log_level = %log_level,
            json = config.json_logs(),
            "Structured logging initialized"
        );
    });
}

fn get_environment() -> String {
    std::env::var("DAO_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// `RUST_LOG` wins, then the configured level; test runs are always verbose
fn get_log_level(environment: &str, config: &DispatchConfig) -> String {
    if let Ok(filter) = std::env::var("RUST_LOG") {
        return filter;
    }
    match environment {
        "test" => "debug".to_string(),
        _ => config.log_level.clone(),
    }
}

/// Log one completed dispatch
pub fn log_call_operation(path: &str, call_id: &str, depth: usize, outcome: &str, duration_ms: i64) {
    tracing::debug!(
        path = %path,
        call_id = %call_id,
        depth = depth,
        outcome = %outcome,
        duration_ms = duration_ms,
        "CALL_OPERATION"
    );
}
