pub mod descriptor;

pub use descriptor::{CopyTradeDescriptor, DescriptorKind};

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Signature: opaque on-chain transaction identifier
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(String);

impl Signature {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Signature {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// TransactionDetail: decoded transaction exactly as the RPC returned it
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionDetail(serde_json::Value);

impl TransactionDetail {
    pub fn new(raw: serde_json::Value) -> Self {
        Self(raw)
    }

    pub fn as_json(&self) -> &serde_json::Value {
        &self.0
    }

    /// Slot the transaction landed in, when the RPC reported one.
    pub fn slot(&self) -> Option<u64> {
        self.0.get("slot").and_then(|s| s.as_u64())
    }
}

impl fmt::Display for TransactionDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
