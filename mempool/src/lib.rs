//! Name-operation overlay on the unconfirmed transaction pool.
//!
//! Many unconfirmed transactions may reference the same name before a block
//! confirms any of them. This crate keeps the secondary index that answers:
//! - which names have a pending registration or update ([`SlotIndex`])
//! - which outpoint the next update of a name must spend
//!   ([`Mempool::last_name_output`])
//! - whether a new transaction's name operation is compatible with everything
//!   already pending ([`Mempool::check_name_ops`])
//! - which pooled transactions a newly confirmed name operation invalidates
//!   ([`Mempool::remove_conflicts`])
//!
//! The index performs no locking. The owner of the [`Mempool`] holds one lock
//! across every composite operation (check-then-add, block connection).

pub mod config;
pub mod entry;
pub mod error;
pub mod events;
pub mod integrity;
pub mod mempool;
pub mod name_op;
pub mod names;
pub mod pool;
pub mod slots;

pub use config::MempoolConfig;
pub use entry::PoolEntry;
pub use error::MempoolError;
pub use events::{ConflictTracker, RemovalNotice, RemovalReason};
pub use integrity::NameIntegrityReport;
pub use mempool::Mempool;
pub use name_op::{NameOp, NameOutput};
pub use names::NameMemPool;
pub use pool::TxPool;
pub use slots::SlotIndex;
