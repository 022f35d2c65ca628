//! Confirmed name records.

use crate::StoreError;
use namepool_types::{Name, NameValue, OutPoint};
use serde::{Deserialize, Serialize};

/// State of a name as of the current chain tip.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRecord {
    pub value: NameValue,
    /// Address script of the current owner.
    pub owner: Vec<u8>,
    /// Output created by the last confirmed operation on this name.
    /// The next update must spend it.
    pub update_outpoint: OutPoint,
    /// Block height of the last confirmed operation.
    pub height: u64,
}

/// Read access to confirmed name state.
pub trait NameStore: Send + Sync {
    /// Look up the confirmed record for `name`, `None` if it was never registered.
    fn get_name(&self, name: &Name) -> Result<Option<NameRecord>, StoreError>;

    fn contains_name(&self, name: &Name) -> Result<bool, StoreError> {
        self.get_name(name).map(|record| record.is_some())
    }
}
