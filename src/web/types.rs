use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Token boosts (DexScreener)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoostedToken {
    #[serde(default)]
    pub url: Option<String>,
    pub chain_id: String,
    pub token_address: String,
    /// Boost amount of the latest order.
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub total_amount: Option<Decimal>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub header: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub links: Vec<TokenLink>,
}

impl BoostedToken {
    pub fn is_solana(&self) -> bool {
        self.chain_id.eq_ignore_ascii_case("solana")
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenLink {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    pub url: String,
}
