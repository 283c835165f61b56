use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::errors::TransportError;
use crate::models::{Signature, TransactionDetail};

use super::types::{RpcRequest, RpcResponse, SignatureInfo};

/// The chain queries the copy-trade pipeline depends on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Up to `limit` most recent signatures touching `address`, newest first.
    async fn fetch_recent_signatures(
        &self,
        address: &str,
        limit: usize,
    ) -> Result<Vec<Signature>, TransportError>;

    /// Full transaction data, or `None` if the node does not know it (yet).
    async fn fetch_transaction_detail(
        &self,
        signature: &Signature,
    ) -> Result<Option<TransactionDetail>, TransportError>;
}

/// Solana JSON-RPC client over plain HTTP.
#[derive(Debug)]
pub struct SolanaRpcClient {
    http: Client,
    url: String,
    next_id: AtomicU64,
}

impl SolanaRpcClient {
    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<Option<T>, TransportError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest::new(id, method, params);

        let resp: RpcResponse<T> = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(err) = resp.error {
            return Err(TransportError::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        Ok(resp.result)
    }
}

#[async_trait]
impl ChainRpc for SolanaRpcClient {
    async fn fetch_recent_signatures(
        &self,
        address: &str,
        limit: usize,
    ) -> Result<Vec<Signature>, TransportError> {
        let infos: Vec<SignatureInfo> = self
            .call("getSignaturesForAddress", json!([address, { "limit": limit }]))
            .await?
            .ok_or_else(|| {
                TransportError::Unexpected("getSignaturesForAddress returned no result".into())
            })?;

        Ok(infos
            .into_iter()
            .map(|info| Signature::new(info.signature))
            .collect())
    }

    async fn fetch_transaction_detail(
        &self,
        signature: &Signature,
    ) -> Result<Option<TransactionDetail>, TransportError> {
        let raw: Option<serde_json::Value> = self
            .call(
                "getTransaction",
                json!([
                    signature.as_str(),
                    { "encoding": "json", "maxSupportedTransactionVersion": 0 }
                ]),
            )
            .await?;

        Ok(raw.map(TransactionDetail::new))
    }
}
