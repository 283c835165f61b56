use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Signature, TransactionDetail};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptorKind {
    Transaction,
}

/// A proposed replica of an observed transaction.
///
/// Inert: nothing signs or submits it. Building one is the last step of
/// the copy-trade pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyTradeDescriptor {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: DescriptorKind,
    /// Wallet whose transaction is being copied.
    pub wallet: String,
    pub signature: Signature,
    #[serde(rename = "data")]
    pub source_detail: TransactionDetail,
    pub created_at: DateTime<Utc>,
}

impl CopyTradeDescriptor {
    pub fn from_transaction(wallet: &str, signature: Signature, detail: TransactionDetail) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: DescriptorKind::Transaction,
            wallet: wallet.to_string(),
            signature,
            source_detail: detail,
            created_at: Utc::now(),
        }
    }
}
