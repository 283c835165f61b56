use std::sync::Arc;
use metrics::{counter, gauge};
use rust_decimal::Decimal;
use tokio::sync::{mpsc, watch};
use tokio::time::sleep;

use crate::config::RiskConfig;
use crate::models::{CopyTradeDescriptor, Signature};
use crate::monitor::WalletMonitor;
use crate::oracle::{DecisionOracle, Verdict};
use crate::solana::ChainRpc;

/// Admits wallets by win rate, polls them, and asks the oracle whether
/// each new transaction should be copied.
pub struct CopyTrader {
    rpc: Arc<dyn ChainRpc>,
    oracle: Arc<dyn DecisionOracle>,
    risk: RiskConfig,
    /// Kept in admission order; polled in that order every cycle.
    monitors: Vec<WalletMonitor>,
    descriptor_tx: Option<mpsc::Sender<CopyTradeDescriptor>>,
}

impl CopyTrader {
    pub fn new(rpc: Arc<dyn ChainRpc>, oracle: Arc<dyn DecisionOracle>, risk: RiskConfig) -> Self {
        Self {
            rpc,
            oracle,
            risk,
            monitors: Vec::new(),
            descriptor_tx: None,
        }
    }

    /// Forward every descriptor built by `run` to `tx`.
    pub fn with_descriptor_sink(mut self, tx: mpsc::Sender<CopyTradeDescriptor>) -> Self {
        self.descriptor_tx = Some(tx);
        self
    }

    pub fn risk_config(&self) -> &RiskConfig {
        &self.risk
    }

    /// Start monitoring `wallet_address` if `win_rate` meets the policy.
    ///
    /// Returns `false` when the wallet is rejected or already monitored; an
    /// existing monitor keeps its cursor.
    pub fn admit(&mut self, wallet_address: &str, win_rate: Decimal) -> bool {
        if win_rate < self.risk.min_win_rate() {
            tracing::debug!(
                wallet = %wallet_address,
                win_rate = %win_rate,
                min_win_rate = %self.risk.min_win_rate(),
                "Wallet below win-rate threshold, not monitoring"
            );
            return false;
        }

        if self.is_monitored(wallet_address) {
            tracing::debug!(wallet = %wallet_address, "Wallet already monitored");
            return false;
        }

        self.monitors.push(WalletMonitor::new(wallet_address));
        gauge!("monitored_wallets").set(self.monitors.len() as f64);

        tracing::info!(
            wallet = %wallet_address,
            win_rate = %win_rate,
            "Started monitoring wallet"
        );
        true
    }

    pub fn is_monitored(&self, wallet_address: &str) -> bool {
        self.monitors
            .iter()
            .any(|m| m.wallet_address() == wallet_address)
    }

    pub fn monitored_wallets(&self) -> Vec<&str> {
        self.monitors.iter().map(|m| m.wallet_address()).collect()
    }

    /// Last reported signature for a monitored wallet.
    pub fn cursor(&self, wallet_address: &str) -> Option<&Signature> {
        self.monitors
            .iter()
            .find(|m| m.wallet_address() == wallet_address)
            .and_then(|m| m.last_signature())
    }

    /// Poll every wallet, then wait `polling_interval`, until `stop` turns
    /// true or its sender is dropped. Stop is raced against both the cycle
    /// and the wait, so a hung upstream call cannot keep the loop alive.
    /// Returns the number of descriptors built by completed cycles.
    pub async fn run(&mut self, mut stop: watch::Receiver<bool>) -> u64 {
        let interval = self.risk.polling_interval();
        tracing::info!(
            wallets = self.monitors.len(),
            interval_ms = interval.as_millis() as u64,
            "Copy trader started"
        );

        let mut total = 0u64;

        loop {
            let built = tokio::select! {
                biased;
                _ = stop_requested(&mut stop) => break,
                built = self.cycle_and_forward() => built,
            };
            total += built;

            tokio::select! {
                biased;
                _ = stop_requested(&mut stop) => break,
                _ = sleep(interval) => {}
            }
        }

        tracing::info!(descriptors = total, "Copy trader stopped");
        total
    }

    async fn cycle_and_forward(&mut self) -> u64 {
        let descriptors = self.run_cycle().await;
        let built = descriptors.len() as u64;

        if let Some(tx) = &self.descriptor_tx {
            for descriptor in descriptors {
                if let Err(e) = tx.send(descriptor).await {
                    tracing::error!(error = %e, "Failed to forward copy-trade descriptor");
                }
            }
        }

        built
    }

    /// One pass over every monitored wallet.
    pub async fn run_cycle(&mut self) -> Vec<CopyTradeDescriptor> {
        let mut descriptors = Vec::new();

        for idx in 0..self.monitors.len() {
            let signatures = self.monitors[idx].poll(self.rpc.as_ref()).await;
            if signatures.is_empty() {
                continue;
            }

            let wallet = self.monitors[idx].wallet_address().to_string();
            counter!("signatures_observed_total").increment(signatures.len() as u64);
            tracing::info!(
                wallet = %wallet,
                count = signatures.len(),
                "New transactions detected"
            );

            for signature in signatures {
                if let Some(descriptor) = self.analyze_transaction(&wallet, signature).await {
                    descriptors.push(descriptor);
                }
            }
        }

        descriptors
    }

    /// Fetch one transaction, ask the oracle about it, and build a
    /// descriptor on an affirmative verdict. Every failure yields `None`.
    pub async fn analyze_transaction(
        &self,
        wallet: &str,
        signature: Signature,
    ) -> Option<CopyTradeDescriptor> {
        let detail = match self.rpc.fetch_transaction_detail(&signature).await {
            Ok(Some(d)) => d,
            Ok(None) => {
                tracing::debug!(signature = %signature, "Transaction not found, skipping");
                return None;
            }
            Err(e) => {
                counter!("rpc_errors_total").increment(1);
                tracing::warn!(
                    error = %e,
                    signature = %signature,
                    "Failed to fetch transaction detail"
                );
                return None;
            }
        };

        counter!("transactions_analyzed_total").increment(1);

        let prompt = decision_prompt(&detail.to_string());
        let verdict = match self.oracle.judge(&prompt).await {
            Ok(text) => Verdict::parse(&text),
            Err(e) => {
                counter!("oracle_errors_total").increment(1);
                tracing::warn!(
                    error = %e,
                    signature = %signature,
                    "Decision oracle failed, not copying"
                );
                return None;
            }
        };

        tracing::info!(
            wallet = %wallet,
            signature = %signature,
            verdict = %verdict,
            "Oracle verdict"
        );

        if !verdict.is_affirmative() {
            return None;
        }

        let descriptor = CopyTradeDescriptor::from_transaction(wallet, signature, detail);
        counter!("copy_descriptors_total").increment(1);
        tracing::info!(
            id = %descriptor.id,
            wallet = %descriptor.wallet,
            signature = %descriptor.signature,
            "Copy-trade descriptor prepared"
        );

        Some(descriptor)
    }
}

fn decision_prompt(detail: &str) -> String {
    format!("Analyze the transaction: {detail} and decide if it's worth copying.")
}

/// Resolves once stop is true or the sender is gone.
async fn stop_requested(stop: &mut watch::Receiver<bool>) {
    loop {
        if *stop.borrow_and_update() {
            return;
        }
        if stop.changed().await.is_err() {
            return;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
