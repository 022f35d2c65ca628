//! Prometheus metrics for the name mempool.
//!
//! [`NameMetrics`] owns a dedicated [`Registry`]; [`NameMetrics::encode`]
//! renders it in the Prometheus text exposition format for whatever endpoint
//! the embedding node exposes.

use prometheus::{
    register_int_counter_with_registry, register_int_gauge_with_registry, Encoder, IntCounter,
    IntGauge, Opts, Registry, TextEncoder,
};

use crate::NodeError;

pub struct NameMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// Transactions carrying a name operation admitted to the pool.
    pub name_ops_admitted: IntCounter,
    /// Transactions refused by the name admission policy.
    pub name_ops_rejected: IntCounter,
    /// Transactions evicted because a confirmed name operation invalidated them.
    pub name_conflicts_evicted: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    pub pending_registrations: IntGauge,
    pub pending_updates: IntGauge,
    pub pool_size: IntGauge,
}

impl NameMetrics {
    /// Create a fresh set of metrics, all registered under a new [`Registry`].
    pub fn new() -> Result<Self, NodeError> {
        let registry = Registry::new();

        let name_ops_admitted = register_int_counter_with_registry!(
            Opts::new(
                "namepool_name_ops_admitted_total",
                "Name operations admitted to the mempool"
            ),
            registry
        )
        .map_err(metrics_error)?;

        let name_ops_rejected = register_int_counter_with_registry!(
            Opts::new(
                "namepool_name_ops_rejected_total",
                "Name operations rejected as conflicting with pending transactions"
            ),
            registry
        )
        .map_err(metrics_error)?;

        let name_conflicts_evicted = register_int_counter_with_registry!(
            Opts::new(
                "namepool_name_conflicts_evicted_total",
                "Pooled transactions evicted by confirmed name operations"
            ),
            registry
        )
        .map_err(metrics_error)?;

        let pending_registrations = register_int_gauge_with_registry!(
            Opts::new(
                "namepool_pending_registrations",
                "Names with a pending registration"
            ),
            registry
        )
        .map_err(metrics_error)?;

        let pending_updates = register_int_gauge_with_registry!(
            Opts::new("namepool_pending_updates", "Names with a pending update"),
            registry
        )
        .map_err(metrics_error)?;

        let pool_size = register_int_gauge_with_registry!(
            Opts::new("namepool_pool_size", "Transactions in the mempool"),
            registry
        )
        .map_err(metrics_error)?;

        Ok(Self {
            registry,
            name_ops_admitted,
            name_ops_rejected,
            name_conflicts_evicted,
            pending_registrations,
            pending_updates,
            pool_size,
        })
    }

    /// Set the gauges from the current pool state.
    pub fn observe(&self, pool_size: usize, registrations: usize, updates: usize) {
        self.pool_size.set(gauge_value(pool_size));
        self.pending_registrations.set(gauge_value(registrations));
        self.pending_updates.set(gauge_value(updates));
    }

    /// Render all metrics in the text exposition format.
    pub fn encode(&self) -> Result<String, NodeError> {
        let mut buf = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buf)
            .map_err(metrics_error)?;
        String::from_utf8(buf).map_err(|e| NodeError::Metrics(e.to_string()))
    }
}

fn gauge_value(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn metrics_error(e: prometheus::Error) -> NodeError {
    NodeError::Metrics(e.to_string())
}
