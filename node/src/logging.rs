//! Structured logging initialisation.
//!
//! The mempool crates log through `tracing` with structured fields
//! (`txid`, `name`, `kind`); this module installs the subscriber that
//! renders them, either as human-readable lines or newline-delimited JSON.
//!
//! `RUST_LOG` takes precedence over the configured level, e.g.
//! `RUST_LOG=info,namepool_mempool=debug` to trace every slot change.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{NodeConfig, NodeError};

/// Selects the output format for structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Coloured output for local development.
    Human,
    /// Newline-delimited JSON for log aggregation pipelines.
    Json,
}

/// Install the global tracing subscriber.
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(format: LogFormat, level: &str) -> Result<(), NodeError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| NodeError::Config(format!("invalid log level {level:?}: {e}")))?;

    let registry = tracing_subscriber::registry().with(filter);
    let result = match format {
        LogFormat::Human => registry.with(fmt::layer().with_target(true)).try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false).with_target(true))
            .try_init(),
    };
    result.map_err(|e| NodeError::Logging(e.to_string()))
}

/// Install the subscriber described by `config`.
pub fn init_from_config(config: &NodeConfig) -> Result<(), NodeError> {
    init_logging(config.log_format(), &config.log_level)
}
