//! Fundamental types for the name-registration mempool overlay.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! transaction ids, names and values, outpoints, output scripts and transactions.

pub mod error;
pub mod hash;
pub mod name;
pub mod transaction;

pub use error::TypesError;
pub use hash::TxId;
pub use name::{Name, NameValue};
pub use transaction::{
    NameOpKind, NameScript, OutPoint, OutputScript, Transaction, TxIn, TxOut,
};
