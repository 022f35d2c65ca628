//! Minimal transaction pool: entries, spender index and removal cascades.
//!
//! This is the generic pool the name overlay sits on. It performs no policy
//! checks of its own: double spends are tolerated on insert (the spender index
//! keeps every spender of an outpoint) and fee/size bookkeeping is absent.

use namepool_types::{OutPoint, Transaction, TxId};
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use crate::{MempoolError, PoolEntry};

#[derive(Debug, Default)]
pub struct TxPool {
    entries: HashMap<TxId, PoolEntry>,
    /// Outpoint → pooled transactions spending it, in admission order.
    spenders: HashMap<OutPoint, Vec<TxId>>,
    /// Admission sequence → txid, for ordered iteration.
    by_sequence: BTreeMap<u64, TxId>,
    next_sequence: u64,
}

impl TxPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry. Fails only if a transaction with the same id is already pooled.
    pub fn insert(&mut self, mut entry: PoolEntry) -> Result<&PoolEntry, MempoolError> {
        let txid = entry.txid();
        let slot = match self.entries.entry(txid) {
            Entry::Occupied(_) => return Err(MempoolError::DuplicateTransaction(txid)),
            Entry::Vacant(slot) => slot,
        };
        entry.sequence = self.next_sequence;
        self.next_sequence += 1;
        self.by_sequence.insert(entry.sequence, txid);

        for input in &entry.tx().inputs {
            self.spenders.entry(input.prevout).or_default().push(txid);
        }
        Ok(slot.insert(entry))
    }

    /// Remove a single entry, leaving its descendants in place.
    pub fn remove(&mut self, txid: &TxId) -> Option<PoolEntry> {
        let entry = self.entries.remove(txid)?;
        self.by_sequence.remove(&entry.sequence);
        for input in &entry.tx().inputs {
            if let Some(list) = self.spenders.get_mut(&input.prevout) {
                list.retain(|spender| spender != txid);
                if list.is_empty() {
                    self.spenders.remove(&input.prevout);
                }
            }
        }
        Some(entry)
    }

    /// Remove `txid` and everything that transitively spends its outputs.
    ///
    /// Entries are returned in removal order: the root first, then its
    /// descendants breadth-first. Unknown `txid` removes nothing.
    pub fn remove_recursive(&mut self, txid: &TxId) -> Vec<PoolEntry> {
        let Some(root) = self.entries.get(txid) else {
            return Vec::new();
        };
        let mut order = vec![*txid];
        order.extend(self.descendants(root.tx()));
        order
            .iter()
            .filter_map(|id| self.remove(id))
            .collect()
    }

    /// Pooled transactions that transitively spend outputs of `tx`, breadth-first.
    ///
    /// `tx` need not be pooled itself and is never part of the result.
    pub fn descendants(&self, tx: &Transaction) -> Vec<TxId> {
        let root = tx.txid();
        let mut seen = HashSet::from([root]);
        let mut result = Vec::new();
        let mut queue = VecDeque::from([(root, tx.outputs.len())]);

        while let Some((parent, n_outputs)) = queue.pop_front() {
            for index in 0..n_outputs {
                let Ok(index) = u32::try_from(index) else {
                    break;
                };
                for child in self.spenders_of(&OutPoint::new(parent, index)) {
                    if !seen.insert(*child) {
                        continue;
                    }
                    result.push(*child);
                    if let Some(entry) = self.entries.get(child) {
                        queue.push_back((*child, entry.tx().outputs.len()));
                    }
                }
            }
        }
        result
    }

    /// Pooled transactions that `tx` transitively spends from.
    pub fn ancestors(&self, tx: &Transaction) -> HashSet<TxId> {
        let mut result = HashSet::new();
        let mut stack: Vec<TxId> = tx.inputs.iter().map(|i| i.prevout.txid).collect();

        while let Some(parent) = stack.pop() {
            let Some(entry) = self.entries.get(&parent) else {
                continue;
            };
            if result.insert(parent) {
                stack.extend(entry.tx().inputs.iter().map(|i| i.prevout.txid));
            }
        }
        result
    }

    /// Pooled transactions spending `outpoint`, in admission order.
    pub fn spenders_of(&self, outpoint: &OutPoint) -> &[TxId] {
        self.spenders
            .get(outpoint)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn get(&self, txid: &TxId) -> Option<&PoolEntry> {
        self.entries.get(txid)
    }

    pub fn contains(&self, txid: &TxId) -> bool {
        self.entries.contains_key(txid)
    }

    /// Entries in admission order.
    pub fn iter(&self) -> impl Iterator<Item = &PoolEntry> {
        self.by_sequence
            .values()
            .filter_map(move |txid| self.entries.get(txid))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.spenders.clear();
        self.by_sequence.clear();
    }
}
