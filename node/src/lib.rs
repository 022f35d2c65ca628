//! Node-side service around the name mempool.
//!
//! The [`NamePoolService`] owns the [`namepool_mempool::Mempool`] behind a
//! single lock and drives it from the node's lifecycle:
//! - admits submitted transactions (policy check and add, atomically)
//! - connects blocks (confirmed removal, conflict eviction, optional sanity check)
//! - answers wallet queries (which outpoint a new name update must spend)
//! - keeps Prometheus metrics and structured logs of all of the above

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod service;

pub use config::NodeConfig;
pub use error::NodeError;
pub use logging::{init_from_config, init_logging, LogFormat};
pub use metrics::NameMetrics;
pub use service::NamePoolService;
