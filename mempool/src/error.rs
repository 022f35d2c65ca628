use namepool_types::{Name, TxId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MempoolError {
    #[error("no pending operation for name {0}")]
    NotFound(Name),

    #[error("transaction {0} is already in the pool")]
    DuplicateTransaction(TxId),

    #[error("slot for name {name} references {txid}, which is not in the pool")]
    SlotOccupantMissing { name: Name, txid: TxId },

    #[error("store error: {0}")]
    Store(#[from] namepool_store::StoreError),
}
