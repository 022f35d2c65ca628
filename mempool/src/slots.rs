//! Per-name pending-operation slots.
//!
//! Two maps from name to the pending transaction occupying it, one per
//! operation kind. `occupy` is the trusted path and overwrites an existing
//! occupant; `release` only clears a slot held by the given transaction, so
//! removing a superseded transaction never clobbers its successor.

use namepool_types::{Name, NameOpKind, TxId};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct SlotIndex {
    registrations: HashMap<Name, TxId>,
    updates: HashMap<Name, TxId>,
}

impl SlotIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the occupant of `(name, kind)` to `txid`.
    ///
    /// Returns the displaced occupant, if any.
    pub fn occupy(&mut self, name: Name, kind: NameOpKind, txid: TxId) -> Option<TxId> {
        self.map_mut(kind).insert(name, txid)
    }

    /// Clear `(name, kind)` if, and only if, `txid` is its current occupant.
    ///
    /// Returns whether the slot was cleared.
    pub fn release(&mut self, name: &Name, kind: NameOpKind, txid: &TxId) -> bool {
        let map = self.map_mut(kind);
        if map.get(name) == Some(txid) {
            map.remove(name);
            true
        } else {
            false
        }
    }

    pub fn occupant(&self, name: &Name, kind: NameOpKind) -> Option<TxId> {
        self.map(kind).get(name).copied()
    }

    pub fn is_registered(&self, name: &Name) -> bool {
        self.registrations.contains_key(name)
    }

    pub fn is_updated(&self, name: &Name) -> bool {
        self.updates.contains_key(name)
    }

    /// All occupied slots of one kind.
    pub fn iter(&self, kind: NameOpKind) -> impl Iterator<Item = (&Name, &TxId)> {
        self.map(kind).iter()
    }

    pub fn len(&self, kind: NameOpKind) -> usize {
        self.map(kind).len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty() && self.updates.is_empty()
    }

    pub fn clear(&mut self) {
        self.registrations.clear();
        self.updates.clear();
    }

    fn map(&self, kind: NameOpKind) -> &HashMap<Name, TxId> {
        match kind {
            NameOpKind::Registration => &self.registrations,
            NameOpKind::Update => &self.updates,
        }
    }

    fn map_mut(&mut self, kind: NameOpKind) -> &mut HashMap<Name, TxId> {
        match kind {
            NameOpKind::Registration => &mut self.registrations,
            NameOpKind::Update => &mut self.updates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txid(n: u8) -> TxId {
        TxId::new([n; 32])
    }

    fn foo() -> Name {
        Name::from("foo")
    }

    #[test]
    fn new_index_is_empty() {
        let slots = SlotIndex::new();
        assert!(slots.is_empty());
        assert!(!slots.is_registered(&foo()));
        assert!(!slots.is_updated(&foo()));
    }

    #[test]
    fn occupy_and_release() {
        let mut slots = SlotIndex::new();
        assert_eq!(slots.occupy(foo(), NameOpKind::Registration, txid(1)), None);
        assert!(slots.is_registered(&foo()));
        assert!(!slots.is_updated(&foo()));

        assert!(slots.release(&foo(), NameOpKind::Registration, &txid(1)));
        assert!(!slots.is_registered(&foo()));
    }

    #[test]
    fn kinds_are_independent() {
        let mut slots = SlotIndex::new();
        slots.occupy(foo(), NameOpKind::Registration, txid(1));
        slots.occupy(foo(), NameOpKind::Update, txid(2));

        assert!(!slots.release(&foo(), NameOpKind::Update, &txid(1)));
        assert!(slots.release(&foo(), NameOpKind::Update, &txid(2)));
        assert!(slots.is_registered(&foo()));
        assert!(!slots.is_updated(&foo()));
    }

    #[test]
    fn occupy_overwrites_and_reports_previous() {
        let mut slots = SlotIndex::new();
        slots.occupy(foo(), NameOpKind::Update, txid(1));
        assert_eq!(
            slots.occupy(foo(), NameOpKind::Update, txid(2)),
            Some(txid(1))
        );
        assert_eq!(slots.occupant(&foo(), NameOpKind::Update), Some(txid(2)));
    }

    #[test]
    fn releasing_superseded_occupant_is_noop() {
        let mut slots = SlotIndex::new();
        slots.occupy(foo(), NameOpKind::Update, txid(1));
        slots.occupy(foo(), NameOpKind::Update, txid(2));

        assert!(!slots.release(&foo(), NameOpKind::Update, &txid(1)));
        assert_eq!(slots.occupant(&foo(), NameOpKind::Update), Some(txid(2)));
    }

    #[test]
    fn release_of_unknown_name_is_noop() {
        let mut slots = SlotIndex::new();
        assert!(!slots.release(&foo(), NameOpKind::Registration, &txid(9)));
        assert!(slots.is_empty());
    }
}
