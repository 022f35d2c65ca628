//! The pool owner's view: transactions plus their name-operation overlay.
//!
//! [`Mempool`] keeps [`TxPool`] and [`NameMemPool`] in lockstep. Every entry
//! that leaves the pool, whatever the reason, releases its name slot and is
//! published to the removal subscribers.

use namepool_store::NameStore;
use namepool_types::{Name, NameOpKind, OutPoint, Transaction, TxId};
use tokio::sync::mpsc;

use crate::events::RemovalBus;
use crate::{
    MempoolError, NameIntegrityReport, NameMemPool, PoolEntry, RemovalNotice,
    RemovalReason, TxPool,
};

#[derive(Debug, Default)]
pub struct Mempool {
    pool: TxPool,
    names: NameMemPool,
    removals: RemovalBus,
}

impl Mempool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a transaction without any policy check.
    ///
    /// Callers run [`Mempool::check_name_ops`] first, under the same lock.
    pub fn add_unchecked(&mut self, tx: Transaction) -> Result<TxId, MempoolError> {
        self.add_entry(PoolEntry::new(tx))
    }

    pub fn add_entry(&mut self, entry: PoolEntry) -> Result<TxId, MempoolError> {
        let entry = self.pool.insert(entry)?;
        self.names.add_unchecked(entry);
        Ok(entry.txid())
    }

    /// Remove `txid` and all of its descendants. Returns the removed ids in removal order.
    pub fn remove_recursive(&mut self, txid: &TxId, reason: RemovalReason) -> Vec<TxId> {
        let removed = self.pool.remove_recursive(txid);
        self.finish_removal(removed, reason)
    }

    /// Admission policy for a transaction that is not yet pooled.
    ///
    /// # Panics
    ///
    /// Panics if the name index is corrupt, as [`Mempool::check_names`] does.
    pub fn check_name_ops(&self, tx: &Transaction) -> bool {
        self.names.check_tx(&self.pool, tx)
    }

    pub fn registers_name(&self, name: &Name) -> bool {
        self.names.registers_name(name)
    }

    pub fn updates_name(&self, name: &Name) -> bool {
        self.names.updates_name(name)
    }

    /// The outpoint a new update of `name` must spend to extend the pending chain.
    pub fn last_name_output(&self, name: &Name) -> Result<OutPoint, MempoolError> {
        self.names.last_name_output(&self.pool, name)
    }

    /// Evict the pooled transactions that the confirmation of `tx` invalidates.
    ///
    /// Returns the evicted ids (conflicts and their descendants) in removal
    /// order. Each is also published with [`RemovalReason::NameConflict`].
    pub fn remove_conflicts(&mut self, tx: &Transaction) -> Vec<TxId> {
        let conflicts = self.names.conflicts(&self.pool, tx);
        let mut evicted = Vec::new();
        for txid in conflicts {
            // already gone if it descends from an earlier conflict
            let removed = self.pool.remove_recursive(&txid);
            evicted.extend(self.finish_removal(removed, RemovalReason::NameConflict));
        }
        if !evicted.is_empty() {
            tracing::info!(
                confirmed = %tx.txid(),
                evicted = evicted.len(),
                "evicted conflicting name operations"
            );
        }
        evicted
    }

    /// Update the pool for a newly connected block.
    ///
    /// Confirmed transactions leave the pool (their descendants stay), pooled
    /// spends of the same inputs are removed as conflicts, then name conflicts
    /// are evicted. Returns the name-conflict evictions in removal order.
    pub fn remove_for_block(&mut self, txs: &[Transaction]) -> Vec<TxId> {
        let mut evicted = Vec::new();
        for tx in txs {
            let txid = tx.txid();
            if let Some(entry) = self.pool.remove(&txid) {
                self.finish_removal(vec![entry], RemovalReason::Block);
            }
            self.remove_spend_conflicts(tx);
            evicted.extend(self.remove_conflicts(tx));
        }
        evicted
    }

    /// Run the consistency diagnostic and collect every violation.
    pub fn verify_names(&self, view: &dyn NameStore) -> Result<NameIntegrityReport, MempoolError> {
        self.names.verify(&self.pool, view)
    }

    /// Run the consistency diagnostic.
    ///
    /// # Panics
    ///
    /// Panics if the index is inconsistent: continuing with a corrupted index
    /// could admit invalid name operations into a block template.
    pub fn check_names(&self, view: &dyn NameStore) -> Result<(), MempoolError> {
        let report = self.verify_names(view)?;
        if !report.is_healthy() {
            tracing::error!(%report, "name mempool is inconsistent");
            panic!("name mempool is inconsistent: {report}");
        }
        Ok(())
    }

    /// Subscribe to removal notices. Dropping the receiver unsubscribes.
    pub fn subscribe_removals(&mut self) -> mpsc::UnboundedReceiver<RemovalNotice> {
        self.removals.subscribe()
    }

    pub fn get(&self, txid: &TxId) -> Option<&PoolEntry> {
        self.pool.get(txid)
    }

    pub fn contains(&self, txid: &TxId) -> bool {
        self.pool.contains(txid)
    }

    /// Pooled entries in admission order.
    pub fn iter(&self) -> impl Iterator<Item = &PoolEntry> {
        self.pool.iter()
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    pub fn pending_registrations(&self) -> usize {
        self.names.slots().len(NameOpKind::Registration)
    }

    pub fn pending_updates(&self) -> usize {
        self.names.slots().len(NameOpKind::Update)
    }

    /// Drop every entry without publishing removals.
    pub fn clear(&mut self) {
        self.pool.clear();
        self.names.clear();
    }

    fn remove_spend_conflicts(&mut self, tx: &Transaction) {
        let txid = tx.txid();
        for input in &tx.inputs {
            let spenders: Vec<TxId> = self
                .pool
                .spenders_of(&input.prevout)
                .iter()
                .copied()
                .filter(|spender| *spender != txid)
                .collect();
            for spender in spenders {
                self.remove_recursive(&spender, RemovalReason::Conflict);
            }
        }
    }

    fn finish_removal(&mut self, removed: Vec<PoolEntry>, reason: RemovalReason) -> Vec<TxId> {
        removed
            .iter()
            .map(|entry| {
                self.names.remove(entry);
                self.removals.publish(RemovalNotice {
                    txid: entry.txid(),
                    reason,
                });
                entry.txid()
            })
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn removals_mut(&mut self) -> &mut RemovalBus {
        &mut self.removals
    }
}
