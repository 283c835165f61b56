use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Router;
use serde_json::json;
use tokio::net::TcpListener;

use yeat::errors::{OracleError, TransportError};
use yeat::models::{Signature, TransactionDetail};
use yeat::oracle::DecisionOracle;
use yeat::solana::ChainRpc;

pub fn sigs(names: &[&str]) -> Vec<Signature> {
    names.iter().map(|n| Signature::from(*n)).collect()
}

// ---------------------------------------------------------------------------
// Scripted chain: each poll pops the next window; details are looked up by name
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct ScriptedRpc {
    windows: Mutex<VecDeque<Result<Vec<Signature>, String>>>,
    failing_details: Mutex<Vec<String>>,
    pub detail_requests: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl ScriptedRpc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_window(&self, names: &[&str]) {
        self.windows.lock().unwrap().push_back(Ok(sigs(names)));
    }

    pub fn push_failure(&self, reason: &str) {
        self.windows.lock().unwrap().push_back(Err(reason.to_string()));
    }

    pub fn fail_detail(&self, name: &str) {
        self.failing_details.lock().unwrap().push(name.to_string());
    }
}

#[async_trait]
impl ChainRpc for ScriptedRpc {
    async fn fetch_recent_signatures(
        &self,
        _address: &str,
        limit: usize,
    ) -> Result<Vec<Signature>, TransportError> {
        match self.windows.lock().unwrap().pop_front() {
            Some(Ok(mut window)) => {
                window.truncate(limit);
                Ok(window)
            }
            Some(Err(reason)) => Err(TransportError::Unexpected(reason)),
            None => Ok(Vec::new()),
        }
    }

    async fn fetch_transaction_detail(
        &self,
        signature: &Signature,
    ) -> Result<Option<TransactionDetail>, TransportError> {
        self.detail_requests
            .lock()
            .unwrap()
            .push(signature.to_string());

        if self
            .failing_details
            .lock()
            .unwrap()
            .iter()
            .any(|s| s == signature.as_str())
        {
            return Err(TransportError::Rpc {
                code: -32009,
                message: "slot skipped".into(),
            });
        }

        Ok(Some(TransactionDetail::new(json!({
            "slot": 250_000_000u64,
            "transaction": { "signatures": [signature.as_str()] }
        }))))
    }
}

// ---------------------------------------------------------------------------
// Scripted oracle: replies per signature mentioned in the prompt
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct ScriptedOracle {
    replies: Mutex<HashMap<String, Result<String, String>>>,
    default_reply: Option<String>,
    pub prompts: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl ScriptedOracle {
    pub fn always(reply: &str) -> Self {
        Self {
            default_reply: Some(reply.to_string()),
            ..Self::default()
        }
    }

    pub fn reply_for(&self, signature: &str, reply: &str) {
        self.replies
            .lock()
            .unwrap()
            .insert(signature.to_string(), Ok(reply.to_string()));
    }

    pub fn fail_for(&self, signature: &str, reason: &str) {
        self.replies
            .lock()
            .unwrap()
            .insert(signature.to_string(), Err(reason.to_string()));
    }
}

#[async_trait]
impl DecisionOracle for ScriptedOracle {
    async fn judge(&self, prompt: &str) -> Result<String, OracleError> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        let replies = self.replies.lock().unwrap();
        let scripted = replies
            .iter()
            .find(|(sig, _)| prompt.contains(&format!("\"{sig}\"")))
            .map(|(_, reply)| reply.clone());

        match scripted {
            Some(Ok(text)) => Ok(text),
            Some(Err(reason)) => Err(OracleError::Malformed(reason)),
            None => self
                .default_reply
                .clone()
                .ok_or_else(|| OracleError::Malformed("no scripted reply".into())),
        }
    }
}

// ---------------------------------------------------------------------------
// Canned HTTP server: an axum app answering every request with the next
// scripted response
// ---------------------------------------------------------------------------

/// One request as the canned server saw it.
#[derive(Debug, Clone)]
pub struct CannedRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: String,
}

#[allow(dead_code)]
impl CannedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body should be JSON")
    }

    pub fn header(&self, name: header::HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Clone)]
struct CannedState {
    responses: Arc<Mutex<VecDeque<(u16, String)>>>,
    requests: Arc<Mutex<Vec<CannedRequest>>>,
}

pub struct CannedServer {
    pub url: String,
    /// Requests in arrival order.
    pub requests: Arc<Mutex<Vec<CannedRequest>>>,
}

#[allow(dead_code)]
pub async fn serve_json(status: u16, body: &str) -> CannedServer {
    serve_sequence(vec![(status, body.to_string())]).await
}

/// The last response repeats once the sequence is exhausted.
pub async fn serve_sequence(responses: Vec<(u16, String)>) -> CannedServer {
    let state = CannedState {
        responses: Arc::new(Mutex::new(responses.into())),
        requests: Arc::new(Mutex::new(Vec::new())),
    };
    let requests = state.requests.clone();
    let app = Router::new().fallback(answer).with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind canned server");
    let addr = listener.local_addr().expect("No local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    CannedServer {
        url: format!("http://{addr}"),
        requests,
    }
}

async fn answer(
    State(state): State<CannedState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    state.requests.lock().unwrap().push(CannedRequest {
        method,
        path: uri.path().to_string(),
        headers,
        body,
    });

    let (status, payload) = {
        let mut remaining = state.responses.lock().unwrap();
        if remaining.len() > 1 {
            remaining.pop_front().unwrap()
        } else {
            remaining.front().cloned().unwrap_or((500, String::new()))
        }
    };

    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(header::CONTENT_TYPE, "application/json")], payload)
}
