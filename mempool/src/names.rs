//! Name-operation bookkeeping layered on the transaction pool.
//!
//! [`NameMemPool`] owns the [`SlotIndex`] and implements the algorithms that
//! need to look at pooled transactions: chain resolution, admission policy,
//! conflict selection and the consistency diagnostic. It never mutates the
//! pool; [`crate::Mempool`] keeps both in lockstep.

use namepool_store::NameStore;
use namepool_types::{Name, NameOpKind, OutPoint, Transaction, TxId};
use std::collections::HashSet;

use crate::{MempoolError, NameIntegrityReport, NameOp, PoolEntry, SlotIndex, TxPool};

#[derive(Debug, Default)]
pub struct NameMemPool {
    slots: SlotIndex,
}

impl NameMemPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slots(&self) -> &SlotIndex {
        &self.slots
    }

    pub fn registers_name(&self, name: &Name) -> bool {
        self.slots.is_registered(name)
    }

    pub fn updates_name(&self, name: &Name) -> bool {
        self.slots.is_updated(name)
    }

    /// Whether any operation on `name` is pending.
    pub fn has_pending(&self, name: &Name) -> bool {
        self.registers_name(name) || self.updates_name(name)
    }

    /// Record the name operation of a newly pooled entry. Trusted path: an
    /// existing occupant of the same slot is displaced, not rejected.
    pub fn add_unchecked(&mut self, entry: &PoolEntry) {
        let (Some(kind), Some(name)) = (entry.name_op().kind(), entry.name()) else {
            return;
        };
        let txid = entry.txid();
        match self.slots.occupy(name.clone(), kind, txid) {
            // chain extensions take over the update slot
            Some(previous) if previous != txid => tracing::debug!(
                %name,
                %kind,
                displaced = %previous,
                occupant = %txid,
                "pending name slot reassigned"
            ),
            _ => tracing::debug!(%name, %kind, %txid, "name slot occupied"),
        }
    }

    /// Forget the name operation of an entry leaving the pool.
    pub fn remove(&mut self, entry: &PoolEntry) {
        let (Some(kind), Some(name)) = (entry.name_op().kind(), entry.name()) else {
            return;
        };
        let txid = entry.txid();
        if self.slots.release(name, kind, &txid) {
            tracing::debug!(%name, %kind, %txid, "name slot released");
        }
    }

    /// The outpoint the next update of `name` must spend.
    ///
    /// Starts at the slot occupant (the update slot wins when both are held)
    /// and follows pooled transactions that spend the current name output and
    /// operate on the same name. An outpoint with more than one pooled spender
    /// ends the walk there.
    pub fn last_name_output(&self, pool: &TxPool, name: &Name) -> Result<OutPoint, MempoolError> {
        let start = self
            .slots
            .occupant(name, NameOpKind::Update)
            .or_else(|| self.slots.occupant(name, NameOpKind::Registration))
            .ok_or_else(|| MempoolError::NotFound(name.clone()))?;

        let mut outpoint = pool
            .get(&start)
            .and_then(PoolEntry::name_outpoint)
            .ok_or_else(|| MempoolError::SlotOccupantMissing {
                name: name.clone(),
                txid: start,
            })?;

        // terminates: a spender of a pooled output is never its own ancestor
        while let [next] = pool.spenders_of(&outpoint) {
            let Some(next_outpoint) = pool
                .get(next)
                .filter(|entry| entry.name() == Some(name))
                .and_then(PoolEntry::name_outpoint)
            else {
                break;
            };
            outpoint = next_outpoint;
        }
        Ok(outpoint)
    }

    /// Admission policy: may `tx` enter the pool given the pending operations?
    ///
    /// # Panics
    ///
    /// Panics if a held slot names a transaction that is not pooled.
    pub fn check_tx(&self, pool: &TxPool, tx: &Transaction) -> bool {
        match NameOp::extract(tx) {
            NameOp::None => true,
            NameOp::Registration(output) => !self.registers_name(&output.name),
            NameOp::Update(output) => {
                if !self.has_pending(&output.name) {
                    return true;
                }
                match self.last_name_output(pool, &output.name) {
                    Ok(last) => tx.spends(&last),
                    // a held slot always resolves unless the index is corrupt
                    Err(e) => {
                        tracing::error!(name = %output.name, error = %e, "cannot resolve pending name chain");
                        panic!("name mempool is inconsistent: {e}");
                    }
                }
            }
        }
    }

    /// Pooled transactions that a confirmed `tx` invalidates, in admission order.
    ///
    /// Every pooled entry operating on the same name conflicts, except `tx`
    /// itself, its pooled ancestors and the pooled transactions built on top
    /// of it. Descendants of the returned entries are not listed.
    pub fn conflicts(&self, pool: &TxPool, tx: &Transaction) -> Vec<TxId> {
        let op = NameOp::extract(tx);
        let Some(name) = op.name() else {
            return Vec::new();
        };
        let txid = tx.txid();
        let ancestors = pool.ancestors(tx);
        let descendants: HashSet<TxId> = pool.descendants(tx).into_iter().collect();

        pool.iter()
            .filter(|entry| entry.name() == Some(name))
            .map(PoolEntry::txid)
            .filter(|id| *id != txid && !ancestors.contains(id) && !descendants.contains(id))
            .collect()
    }

    /// Check the slot bookkeeping against the pool and confirmed state.
    ///
    /// Every occupied slot must name a pooled transaction performing that
    /// kind of operation on that name, and every pooled update must target a
    /// name that is either confirmed or has a pending registration.
    pub fn verify(
        &self,
        pool: &TxPool,
        view: &dyn NameStore,
    ) -> Result<NameIntegrityReport, MempoolError> {
        let mut report = NameIntegrityReport::default();

        for kind in [NameOpKind::Registration, NameOpKind::Update] {
            for (name, txid) in self.slots.iter(kind) {
                report.slots_checked += 1;
                match pool.get(txid) {
                    None => report
                        .violations
                        .push(format!("{kind} slot for {name} references missing tx {txid}")),
                    Some(entry) => {
                        if entry.name_op().kind() != Some(kind) || entry.name() != Some(name) {
                            report.violations.push(format!(
                                "{kind} slot for {name} references tx {txid} performing {:?}",
                                entry.name_op()
                            ));
                        }
                    }
                }
            }
        }

        for entry in pool.iter() {
            if entry.name_op().kind().is_none() {
                continue;
            }
            report.entries_checked += 1;
            let NameOp::Update(output) = entry.name_op() else {
                continue;
            };
            if !self.registers_name(&output.name) && !view.contains_name(&output.name)? {
                report.violations.push(format!(
                    "tx {} updates unknown name {}",
                    entry.txid(),
                    output.name
                ));
            }
        }

        Ok(report)
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
