pub mod openai;
pub mod verdict;

pub use openai::OpenAiOracle;
pub use verdict::Verdict;

use async_trait::async_trait;

use crate::errors::OracleError;

/// Free-text judgment service consulted before a transaction is copied.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DecisionOracle: Send + Sync {
    async fn judge(&self, prompt: &str) -> Result<String, OracleError>;
}
