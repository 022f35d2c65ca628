//! Removal notifications and conflict tracking.
//!
//! Every entry leaving the pool is published as a [`RemovalNotice`] to each
//! live subscriber over an unbounded channel. Subscribers whose receiver has
//! been dropped are pruned on the next publish.

use namepool_types::TxId;
use tokio::sync::mpsc;

use crate::Mempool;

/// Why an entry left the pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RemovalReason {
    /// Included in a connected block.
    Block,
    /// Spends an input that a connected block also spends.
    Conflict,
    /// Performs a name operation invalidated by a confirmed one.
    NameConflict,
    /// Removed explicitly by the pool owner.
    Manual,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RemovalNotice {
    pub txid: TxId,
    pub reason: RemovalReason,
}

/// Fan-out of removal notices to channel subscribers.
#[derive(Debug, Default)]
pub(crate) struct RemovalBus {
    subscribers: Vec<mpsc::UnboundedSender<RemovalNotice>>,
}

impl RemovalBus {
    pub(crate) fn subscribe(&mut self) -> mpsc::UnboundedReceiver<RemovalNotice> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    pub(crate) fn publish(&mut self, notice: RemovalNotice) {
        self.subscribers.retain(|sub| sub.send(notice).is_ok());
    }

    #[cfg(test)]
    pub(crate) fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

/// Records the transactions removed for [`RemovalReason::NameConflict`] while alive.
///
/// Create it right before the operation that may evict name conflicts and
/// read it right after; dropping it unsubscribes.
pub struct ConflictTracker {
    rx: mpsc::UnboundedReceiver<RemovalNotice>,
    conflicts: Vec<TxId>,
}

impl ConflictTracker {
    pub fn new(pool: &mut Mempool) -> Self {
        Self {
            rx: pool.subscribe_removals(),
            conflicts: Vec::new(),
        }
    }

    /// Transactions evicted as name conflicts since creation, in removal order.
    pub fn name_conflicts(&mut self) -> &[TxId] {
        while let Ok(notice) = self.rx.try_recv() {
            if notice.reason == RemovalReason::NameConflict {
                self.conflicts.push(notice.txid);
            }
        }
        &self.conflicts
    }
}
