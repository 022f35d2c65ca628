//! Nullable name store: thread-safe in-memory confirmed state for testing.

use namepool_store::{NameRecord, NameStore, StoreError};
use namepool_types::Name;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// An in-memory confirmed-name view.
/// Thread-safe for use with tokio's multi-threaded runtime.
pub struct NullNameStore {
    names: Mutex<HashMap<Name, NameRecord>>,
}

impl NullNameStore {
    pub fn new() -> Self {
        Self {
            names: Mutex::new(HashMap::new()),
        }
    }

    /// Record `name` as confirmed with the given state, replacing any previous record.
    pub fn set_name(&self, name: Name, record: NameRecord) {
        self.lock().insert(name, record);
    }

    /// Forget a confirmed name (e.g. to simulate a reorg undoing its registration).
    pub fn delete_name(&self, name: &Name) -> Option<NameRecord> {
        self.lock().remove(name)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Name, NameRecord>> {
        // a panicking test thread must not take the fixture down with it
        self.names.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for NullNameStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NameStore for NullNameStore {
    fn get_name(&self, name: &Name) -> Result<Option<NameRecord>, StoreError> {
        Ok(self.lock().get(name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use namepool_types::{NameValue, OutPoint, TxId};

    fn record(value: &str) -> NameRecord {
        NameRecord {
            value: NameValue::from(value),
            owner: vec![0x51],
            update_outpoint: OutPoint::new(TxId::new([1; 32]), 0),
            height: 100,
        }
    }

    #[test]
    fn unknown_name_is_none() {
        let store = NullNameStore::new();
        assert_eq!(store.get_name(&Name::from("foo")).unwrap(), None);
        assert!(!store.contains_name(&Name::from("foo")).unwrap());
    }

    #[test]
    fn set_then_get() {
        let store = NullNameStore::new();
        store.set_name(Name::from("foo"), record("x"));
        assert_eq!(store.get_name(&Name::from("foo")).unwrap(), Some(record("x")));
        assert!(store.contains_name(&Name::from("foo")).unwrap());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn delete_removes_record() {
        let store = NullNameStore::new();
        store.set_name(Name::from("foo"), record("x"));
        assert_eq!(store.delete_name(&Name::from("foo")), Some(record("x")));
        assert!(store.is_empty());
    }
}
