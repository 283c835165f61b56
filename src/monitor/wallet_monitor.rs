use metrics::counter;

use crate::models::Signature;
use crate::solana::ChainRpc;

/// How many of the newest signatures one poll looks at.
pub const SIGNATURE_WINDOW: usize = 10;

/// Tracks the newest signature already reported for one wallet.
#[derive(Debug, Clone)]
pub struct WalletMonitor {
    wallet_address: String,
    last_signature: Option<Signature>,
}

impl WalletMonitor {
    pub fn new(wallet_address: impl Into<String>) -> Self {
        Self {
            wallet_address: wallet_address.into(),
            last_signature: None,
        }
    }

    pub fn wallet_address(&self) -> &str {
        &self.wallet_address
    }

    pub fn last_signature(&self) -> Option<&Signature> {
        self.last_signature.as_ref()
    }

    /// Report signatures not seen by an earlier poll, newest first.
    ///
    /// Only the newest `SIGNATURE_WINDOW` signatures are inspected. If the
    /// cursor is not among them, the whole window is reported and anything
    /// older than the window is never seen.
    ///
    /// Transport failures are logged and yield an empty list; the cursor
    /// only moves on a non-empty result.
    pub async fn poll(&mut self, rpc: &dyn ChainRpc) -> Vec<Signature> {
        let window = match rpc
            .fetch_recent_signatures(&self.wallet_address, SIGNATURE_WINDOW)
            .await
        {
            Ok(w) => w,
            Err(e) => {
                counter!("rpc_errors_total").increment(1);
                tracing::warn!(
                    error = %e,
                    wallet = %self.wallet_address,
                    "Wallet monitor: failed to fetch signatures"
                );
                return Vec::new();
            }
        };

        if window.is_empty() {
            return Vec::new();
        }

        let window_len = window.len().min(SIGNATURE_WINDOW);
        let new_signatures: Vec<Signature> = window
            .into_iter()
            .take(SIGNATURE_WINDOW)
            .take_while(|sig| Some(sig) != self.last_signature.as_ref())
            .collect();

        if let Some(newest) = new_signatures.first() {
            if self.last_signature.is_some() && new_signatures.len() == window_len {
                tracing::debug!(
                    wallet = %self.wallet_address,
                    window = window_len,
                    "Cursor not found in window; older signatures may have been skipped"
                );
            }
            self.last_signature = Some(newest.clone());
        }

        new_signatures
    }
}
