mod common;

use axum::http::{header, Method};
use yeat::errors::{OracleError, TransportError};
use yeat::models::Signature;
use yeat::oracle::{DecisionOracle, OpenAiOracle};
use yeat::solana::{ChainRpc, SolanaRpcClient};
use yeat::web::{DataClientError, DexScreenerClient};

// ---------------------------------------------------------------------------
// Solana JSON-RPC
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_rpc_fetches_signatures_newest_first() {
    let server = common::serve_json(
        200,
        r#"{"jsonrpc":"2.0","id":1,"result":[
            {"signature":"S3","slot":3,"err":null,"memo":null,"blockTime":1700000003,"confirmationStatus":"finalized"},
            {"signature":"S2","slot":2,"err":null,"memo":null,"blockTime":1700000002,"confirmationStatus":"finalized"}
        ]}"#,
    )
    .await;
    let client = SolanaRpcClient::new(reqwest::Client::new(), server.url.as_str());

    let found = client
        .fetch_recent_signatures("Vote111111111111111111111111111111111111111", 10)
        .await
        .expect("signatures should decode");

    assert_eq!(found, common::sigs(&["S3", "S2"]));

    let requests = server.requests.lock().unwrap();
    assert_eq!(requests[0].method, Method::POST);
    assert_eq!(
        requests[0].header(header::CONTENT_TYPE),
        Some("application/json")
    );
    let request = requests[0].json();
    assert_eq!(request["jsonrpc"], "2.0");
    assert_eq!(request["method"], "getSignaturesForAddress");
    assert_eq!(request["params"][0], "Vote111111111111111111111111111111111111111");
    assert_eq!(request["params"][1]["limit"], 10);
}

#[tokio::test]
async fn test_rpc_error_object_is_transport_error() {
    let server = common::serve_json(
        200,
        r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32602,"message":"Invalid param: WrongSize"}}"#,
    )
    .await;
    let client = SolanaRpcClient::new(reqwest::Client::new(), server.url.as_str());

    let err = client
        .fetch_recent_signatures("bad", 10)
        .await
        .expect_err("RPC error should surface");

    match err {
        TransportError::Rpc { code, message } => {
            assert_eq!(code, -32602);
            assert!(message.contains("WrongSize"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_rpc_http_failure_is_transport_error() {
    let server = common::serve_json(500, "{}").await;
    let client = SolanaRpcClient::new(reqwest::Client::new(), server.url.as_str());

    let err = client.fetch_recent_signatures("any", 10).await.unwrap_err();
    assert!(matches!(err, TransportError::Http(_)));
}

#[tokio::test]
async fn test_rpc_transaction_detail_and_null() {
    let server = common::serve_sequence(vec![
        (
            200,
            r#"{"jsonrpc":"2.0","id":1,"result":{"slot":430,"blockTime":null,"meta":{"fee":5000},"transaction":{"signatures":["S1"]}}}"#.into(),
        ),
        (200, r#"{"jsonrpc":"2.0","id":2,"result":null}"#.into()),
    ])
    .await;
    let client = SolanaRpcClient::new(reqwest::Client::new(), server.url.as_str());

    let detail = client
        .fetch_transaction_detail(&Signature::from("S1"))
        .await
        .unwrap()
        .expect("detail should be present");
    assert_eq!(detail.slot(), Some(430));
    assert_eq!(detail.as_json()["meta"]["fee"], 5000);

    let missing = client
        .fetch_transaction_detail(&Signature::from("S0"))
        .await
        .unwrap();
    assert!(missing.is_none());

    let requests = server.requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    let request = requests[0].json();
    assert_eq!(request["method"], "getTransaction");
    assert_eq!(request["params"][0], "S1");
    assert_eq!(request["params"][1]["maxSupportedTransactionVersion"], 0);

    let second = requests[1].json();
    assert_ne!(request["id"], second["id"], "request ids should not repeat");
}

// ---------------------------------------------------------------------------
// Decision oracle
// ---------------------------------------------------------------------------

fn oracle_for(server: &common::CannedServer) -> OpenAiOracle {
    OpenAiOracle::new(
        reqwest::Client::new(),
        "sk-test",
        server.url.as_str(),
        "gpt-3.5-turbo",
    )
}

#[tokio::test]
async fn test_oracle_returns_trimmed_completion() {
    let server = common::serve_json(
        200,
        r#"{"id":"chatcmpl-1","choices":[{"index":0,"message":{"role":"assistant","content":"  Yes, copy it.\n"},"finish_reason":"stop"}]}"#,
    )
    .await;
    let oracle = oracle_for(&server);

    let text = oracle
        .judge("Analyze the transaction: {} and decide if it's worth copying.")
        .await
        .unwrap();
    assert_eq!(text, "Yes, copy it.");

    let requests = server.requests.lock().unwrap();
    assert_eq!(requests[0].method, Method::POST);
    assert_eq!(requests[0].path, "/chat/completions");
    assert_eq!(
        requests[0].header(header::AUTHORIZATION),
        Some("Bearer sk-test")
    );

    let request = requests[0].json();
    assert_eq!(request["model"], "gpt-3.5-turbo");
    assert_eq!(request["max_tokens"], 100);
    assert_eq!(request["messages"][0]["role"], "user");
}

#[tokio::test]
async fn test_oracle_quota_error() {
    let server = common::serve_json(429, r#"{"error":{"message":"quota exceeded"}}"#).await;
    let oracle = oracle_for(&server);

    let err = oracle.judge("prompt").await.unwrap_err();
    match err {
        OracleError::Status { status, body } => {
            assert_eq!(status, 429);
            assert!(body.contains("quota exceeded"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_oracle_without_choices_is_malformed() {
    let server = common::serve_json(200, r#"{"id":"chatcmpl-2","choices":[]}"#).await;
    let oracle = oracle_for(&server);

    let err = oracle.judge("prompt").await.unwrap_err();
    assert!(matches!(err, OracleError::Malformed(_)));
}

// ---------------------------------------------------------------------------
// DexScreener
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_latest_boosted_tokens() {
    let server = common::serve_json(
        200,
        r#"[{"url":"https://dexscreener.com/solana/x","chainId":"solana","tokenAddress":"Xpump","amount":10,"totalAmount":100}]"#,
    )
    .await;
    let client = DexScreenerClient::with_base_url(reqwest::Client::new(), server.url.as_str());

    let tokens = client.get_latest_boosted().await.unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].token_address, "Xpump");
    assert!(tokens[0].is_solana());

    let requests = server.requests.lock().unwrap();
    assert_eq!(requests[0].method, Method::GET);
    assert_eq!(requests[0].path, "/token-boosts/latest/v1");
}

#[tokio::test]
async fn test_latest_boosted_single_object() {
    let server = common::serve_json(200, r#"{"chainId":"base","tokenAddress":"0xabc"}"#).await;
    let client = DexScreenerClient::with_base_url(reqwest::Client::new(), server.url.as_str());

    let tokens = client.get_latest_boosted().await.unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].chain_id, "base");
}

#[tokio::test]
async fn test_latest_boosted_http_error() {
    let server = common::serve_json(500, "{}").await;
    let client = DexScreenerClient::with_base_url(reqwest::Client::new(), server.url.as_str());

    let err = client.get_latest_boosted().await.unwrap_err();
    assert!(matches!(err, DataClientError::Http(_)));
}
