//! Pooled transactions.

use namepool_types::{Name, OutPoint, Transaction, TxId};
use std::sync::Arc;

use crate::NameOp;

/// A transaction admitted to the pool, with its name operation pre-classified.
#[derive(Clone, Debug)]
pub struct PoolEntry {
    tx: Arc<Transaction>,
    txid: TxId,
    name_op: NameOp,
    /// Admission order, assigned by the pool on insert.
    pub(crate) sequence: u64,
}

impl PoolEntry {
    pub fn new(tx: Transaction) -> Self {
        Self::from_arc(Arc::new(tx))
    }

    pub fn from_arc(tx: Arc<Transaction>) -> Self {
        let txid = tx.txid();
        let name_op = NameOp::extract(&tx);
        Self {
            tx,
            txid,
            name_op,
            sequence: 0,
        }
    }

    pub fn txid(&self) -> TxId {
        self.txid
    }

    pub fn tx(&self) -> &Arc<Transaction> {
        &self.tx
    }

    pub fn name_op(&self) -> &NameOp {
        &self.name_op
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn name(&self) -> Option<&Name> {
        self.name_op.name()
    }

    pub fn is_name_registration(&self) -> bool {
        self.name_op.is_registration()
    }

    pub fn is_name_update(&self) -> bool {
        self.name_op.is_update()
    }

    /// The outpoint of this transaction's name-carrying output.
    pub fn name_outpoint(&self) -> Option<OutPoint> {
        self.name_op.outpoint(self.txid)
    }
}
