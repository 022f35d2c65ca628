//! Abstract storage traits for confirmed name state.
//!
//! The mempool overlay only ever reads confirmed state. Backends (an on-disk
//! chain-state database, the in-memory null store for tests) implement
//! [`NameStore`]; the rest of the workspace depends only on the trait.

pub mod error;
pub mod name;

pub use error::StoreError;
pub use name::{NameRecord, NameStore};
