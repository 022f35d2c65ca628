//! Names and the values attached to them.
//!
//! Both are opaque byte strings. Equality is byte-exact and no normalisation
//! is ever applied.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A globally scarce identifier.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Name(Vec<u8>);

impl Name {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Name {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_bytes(f, &self.0)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name(")?;
        write_bytes(f, &self.0)?;
        write!(f, ")")
    }
}

/// Data attached to a name by a registration or update.
#[derive(Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct NameValue(Vec<u8>);

impl NameValue {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<&str> for NameValue {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl fmt::Debug for NameValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NameValue(")?;
        write_bytes(f, &self.0)?;
        write!(f, ")")
    }
}

/// Printable ASCII is rendered as-is, anything else as `0x`-prefixed hex.
fn write_bytes(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    if bytes.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
        // all bytes are ASCII, so this is valid UTF-8
        write!(f, "{}", String::from_utf8_lossy(bytes))
    } else {
        write!(f, "0x{}", hex::encode(bytes))
    }
}
