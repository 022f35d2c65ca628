//! The locked service wrapper around the name mempool.
//!
//! Every composite operation (check-then-add, block connection) holds the
//! mempool lock for its full extent, so no conflicting transaction can slip in
//! between the admission check and the add.

use std::sync::Arc;

use namepool_mempool::{Mempool, MempoolConfig, NameOp, RemovalNotice, RemovalReason};
use namepool_store::NameStore;
use namepool_types::{Name, OutPoint, Transaction, TxId};
use tokio::sync::{mpsc, Mutex};

use crate::{NameMetrics, NodeConfig, NodeError};

pub struct NamePoolService {
    mempool: Mutex<Mempool>,
    store: Arc<dyn NameStore>,
    config: MempoolConfig,
    metrics: Option<NameMetrics>,
}

impl NamePoolService {
    pub fn new(config: &NodeConfig, store: Arc<dyn NameStore>) -> Result<Self, NodeError> {
        let metrics = if config.enable_metrics {
            Some(NameMetrics::new()?)
        } else {
            None
        };
        Ok(Self {
            mempool: Mutex::new(Mempool::new()),
            store,
            config: config.mempool.clone(),
            metrics,
        })
    }

    /// Admit a transaction if its name operation is compatible with the pool.
    pub async fn submit(&self, tx: Transaction) -> Result<TxId, NodeError> {
        let op = NameOp::extract(&tx);
        let mut pool = self.mempool.lock().await;

        if !pool.check_name_ops(&tx) {
            // only name operations are ever rejected
            let name = op.name().cloned().unwrap_or_else(|| Name::new(Vec::new()));
            tracing::warn!(txid = %tx.txid(), %name, "rejected conflicting name operation");
            if let Some(metrics) = &self.metrics {
                metrics.name_ops_rejected.inc();
            }
            return Err(NodeError::NameConflict(name));
        }

        let txid = pool.add_unchecked(tx)?;
        if let Some(name) = op.name() {
            tracing::debug!(%txid, %name, "admitted name operation");
            if let Some(metrics) = &self.metrics {
                metrics.name_ops_admitted.inc();
            }
        }
        self.observe(&pool);
        Ok(txid)
    }

    /// Remove a transaction and its descendants from the pool.
    pub async fn remove(&self, txid: &TxId, reason: RemovalReason) -> Vec<TxId> {
        let mut pool = self.mempool.lock().await;
        let removed = pool.remove_recursive(txid, reason);
        self.observe(&pool);
        removed
    }

    /// Update the pool for a connected block and return the evicted name conflicts.
    ///
    /// The store must already reflect the block when the sanity check is enabled.
    pub async fn connect_block(&self, txs: &[Transaction]) -> Result<Vec<TxId>, NodeError> {
        let mut pool = self.mempool.lock().await;
        let evicted = pool.remove_for_block(txs);

        if let Some(metrics) = &self.metrics {
            metrics.name_conflicts_evicted.inc_by(evicted.len() as u64);
        }
        if self.config.sanity_check_names {
            pool.check_names(self.store.as_ref())?;
        }
        self.observe(&pool);

        tracing::debug!(
            txs = txs.len(),
            evicted = evicted.len(),
            pool_size = pool.len(),
            "block connected to name mempool"
        );
        Ok(evicted)
    }

    /// Run the consistency diagnostic against the confirmed state.
    ///
    /// # Panics
    ///
    /// Panics if the name index is inconsistent.
    pub async fn check_names(&self) -> Result<(), NodeError> {
        let pool = self.mempool.lock().await;
        pool.check_names(self.store.as_ref())?;
        Ok(())
    }

    /// The outpoint a new update of `name` must spend.
    ///
    /// Extends the pending chain when the pool has an operation on `name`,
    /// otherwise spends the output of the last confirmed operation.
    pub async fn update_input(&self, name: &Name) -> Result<OutPoint, NodeError> {
        {
            let pool = self.mempool.lock().await;
            if pool.registers_name(name) || pool.updates_name(name) {
                return Ok(pool.last_name_output(name)?);
            }
        }
        match self.store.get_name(name)? {
            Some(record) => Ok(record.update_outpoint),
            None => Err(NodeError::NameNotUpdatable(name.clone())),
        }
    }

    /// Refuse to build a registration that the pool would reject.
    pub async fn ensure_registrable(&self, name: &Name) -> Result<(), NodeError> {
        if self.mempool.lock().await.registers_name(name) {
            return Err(NodeError::PendingRegistration(name.clone()));
        }
        Ok(())
    }

    pub async fn registers_name(&self, name: &Name) -> bool {
        self.mempool.lock().await.registers_name(name)
    }

    pub async fn updates_name(&self, name: &Name) -> bool {
        self.mempool.lock().await.updates_name(name)
    }

    /// Subscribe to removal notices, e.g. to let a wallet mark evicted transactions as dead.
    pub async fn subscribe_removals(&self) -> mpsc::UnboundedReceiver<RemovalNotice> {
        self.mempool.lock().await.subscribe_removals()
    }

    pub async fn len(&self) -> usize {
        self.mempool.lock().await.len()
    }

    /// The lock guarding the mempool, for callers composing their own critical sections.
    pub fn mempool(&self) -> &Mutex<Mempool> {
        &self.mempool
    }

    pub fn metrics(&self) -> Option<&NameMetrics> {
        self.metrics.as_ref()
    }

    fn observe(&self, pool: &Mempool) {
        if let Some(metrics) = &self.metrics {
            metrics.observe(pool.len(), pool.pending_registrations(), pool.pending_updates());
        }
    }
}
