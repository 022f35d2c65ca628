//! Classification of a transaction's name operation.
//!
//! A valid transaction carries at most one name-carrying output. Transactions
//! with more than one are invalid under consensus rules enforced elsewhere;
//! the index classifies them as carrying no operation instead of failing.

use namepool_types::{Name, NameOpKind, NameValue, OutPoint, OutputScript, Transaction, TxId};

/// The name-carrying output of a transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameOutput {
    pub name: Name,
    pub value: NameValue,
    pub output_index: u32,
}

/// Name operation performed by a transaction.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum NameOp {
    #[default]
    None,
    Registration(NameOutput),
    Update(NameOutput),
}

impl NameOp {
    /// Scan the outputs of `tx` for name-carrying scripts.
    ///
    /// Exactly one such output yields a registration or update; zero or more
    /// than one yield [`NameOp::None`]. Never fails.
    pub fn extract(tx: &Transaction) -> Self {
        let mut found = None;
        for (index, output) in tx.outputs.iter().enumerate() {
            let OutputScript::Name(script) = &output.script else {
                continue;
            };
            if found.is_some() {
                return NameOp::None;
            }
            let Ok(output_index) = u32::try_from(index) else {
                return NameOp::None;
            };
            found = Some((script, output_index));
        }

        match found {
            None => NameOp::None,
            Some((script, output_index)) => {
                let output = NameOutput {
                    name: script.name.clone(),
                    value: script.value.clone(),
                    output_index,
                };
                match script.kind {
                    NameOpKind::Registration => NameOp::Registration(output),
                    NameOpKind::Update => NameOp::Update(output),
                }
            }
        }
    }

    pub fn kind(&self) -> Option<NameOpKind> {
        match self {
            NameOp::None => None,
            NameOp::Registration(_) => Some(NameOpKind::Registration),
            NameOp::Update(_) => Some(NameOpKind::Update),
        }
    }

    pub fn output(&self) -> Option<&NameOutput> {
        match self {
            NameOp::None => None,
            NameOp::Registration(output) | NameOp::Update(output) => Some(output),
        }
    }

    pub fn name(&self) -> Option<&Name> {
        self.output().map(|output| &output.name)
    }

    pub fn is_registration(&self) -> bool {
        matches!(self, NameOp::Registration(_))
    }

    pub fn is_update(&self) -> bool {
        matches!(self, NameOp::Update(_))
    }

    /// The name-carrying outpoint, given the id of the transaction this operation belongs to.
    pub fn outpoint(&self, txid: TxId) -> Option<OutPoint> {
        self.output()
            .map(|output| OutPoint::new(txid, output.output_index))
    }
}
