//! Transactions, their inputs and outputs, and name-carrying output scripts.

use blake2::Digest;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::hash::Blake2b256;
use crate::{Name, NameValue, TxId};

/// Reference to a specific output of a transaction.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OutPoint {
    pub txid: TxId,
    pub index: u32,
}

impl OutPoint {
    pub fn new(txid: TxId, index: u32) -> Self {
        Self { txid, index }
    }
}

impl fmt::Debug for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OutPoint({:?}:{})", self.txid, self.index)
    }
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.txid, self.index)
    }
}

/// A transaction input. Signature data is validated elsewhere and not modelled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxIn {
    pub prevout: OutPoint,
}

impl TxIn {
    pub fn new(prevout: OutPoint) -> Self {
        Self { prevout }
    }
}

/// Which kind of name operation a script performs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NameOpKind {
    Registration,
    Update,
}

impl fmt::Display for NameOpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameOpKind::Registration => write!(f, "registration"),
            NameOpKind::Update => write!(f, "update"),
        }
    }
}

/// A name-carrying output script: a name operation plus the owning address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameScript {
    pub kind: NameOpKind,
    pub name: Name,
    pub value: NameValue,
    /// Script of the address that owns the name after this operation.
    pub address: Vec<u8>,
}

impl NameScript {
    pub fn register(address: impl Into<Vec<u8>>, name: Name, value: NameValue) -> Self {
        Self {
            kind: NameOpKind::Registration,
            name,
            value,
            address: address.into(),
        }
    }

    pub fn update(address: impl Into<Vec<u8>>, name: Name, value: NameValue) -> Self {
        Self {
            kind: NameOpKind::Update,
            name,
            value,
            address: address.into(),
        }
    }
}

/// Locking script of an output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputScript {
    /// Any script without name semantics (currency outputs, data carriers, ...).
    Plain(Vec<u8>),
    Name(NameScript),
}

impl OutputScript {
    pub fn name_script(&self) -> Option<&NameScript> {
        match self {
            OutputScript::Name(script) => Some(script),
            OutputScript::Plain(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOut {
    pub amount: u64,
    pub script: OutputScript,
}

impl TxOut {
    pub fn new(amount: u64, script: OutputScript) -> Self {
        Self { amount, script }
    }

    pub fn plain(amount: u64, script: impl Into<Vec<u8>>) -> Self {
        Self::new(amount, OutputScript::Plain(script.into()))
    }

    pub fn name(amount: u64, script: NameScript) -> Self {
        Self::new(amount, OutputScript::Name(script))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub version: u32,
    pub inputs: Vec<TxIn>,
    pub outputs: Vec<TxOut>,
    pub lock_time: u32,
}

impl Transaction {
    pub const CURRENT_VERSION: u32 = 1;

    pub fn new(inputs: Vec<TxIn>, outputs: Vec<TxOut>) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            inputs,
            outputs,
            lock_time: 0,
        }
    }

    /// Blake2b-256 over the canonical encoding of every field, in declaration order.
    ///
    /// Variable-length fields are prefixed with their little-endian `u32` length,
    /// so distinct transactions never share an encoding.
    pub fn txid(&self) -> TxId {
        let mut hasher = Blake2b256::new();
        hasher.update(self.version.to_le_bytes());

        hasher.update(len_prefix(self.inputs.len()));
        for input in &self.inputs {
            hasher.update(input.prevout.txid.as_bytes());
            hasher.update(input.prevout.index.to_le_bytes());
        }

        hasher.update(len_prefix(self.outputs.len()));
        for output in &self.outputs {
            hasher.update(output.amount.to_le_bytes());
            match &output.script {
                OutputScript::Plain(bytes) => {
                    hasher.update([0u8]);
                    update_bytes(&mut hasher, bytes);
                }
                OutputScript::Name(script) => {
                    hasher.update([1u8]);
                    hasher.update([match script.kind {
                        NameOpKind::Registration => 0u8,
                        NameOpKind::Update => 1u8,
                    }]);
                    update_bytes(&mut hasher, script.name.as_bytes());
                    update_bytes(&mut hasher, script.value.as_bytes());
                    update_bytes(&mut hasher, &script.address);
                }
            }
        }

        hasher.update(self.lock_time.to_le_bytes());
        TxId::from_hasher(hasher)
    }

    /// Whether any input spends `outpoint`.
    pub fn spends(&self, outpoint: &OutPoint) -> bool {
        self.inputs.iter().any(|input| input.prevout == *outpoint)
    }
}

fn len_prefix(len: usize) -> [u8; 4] {
    // transactions never approach u32::MAX elements
    (len as u32).to_le_bytes()
}

fn update_bytes(hasher: &mut Blake2b256, bytes: &[u8]) {
    hasher.update(len_prefix(bytes.len()));
    hasher.update(bytes);
}
