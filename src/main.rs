use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use yeat::config::AppConfig;
use yeat::execution::CopyTrader;
use yeat::framework::Framework;
use yeat::models::CopyTradeDescriptor;
use yeat::oracle::OpenAiOracle;
use yeat::solana::SolanaRpcClient;
use yeat::web::{DexScreenerClient, WebAutomation, WebDriverBrowser, WebNavigator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;

    if let Some(addr) = &config.metrics_addr {
        yeat::metrics::init_metrics(addr.parse()?)?;
        tracing::info!(addr = %addr, "Prometheus exporter listening");
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let task = args.first().cloned().unwrap_or_else(|| "trade".into());
    let trading = task.to_lowercase().contains("trade");
    let http = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()?;

    // --- One-shot: latest boosted tokens ---
    if task.eq_ignore_ascii_case("boosted") {
        let client = DexScreenerClient::with_base_url(http, config.dexscreener_base_url.as_str());
        let tokens = client.get_latest_boosted().await?;
        tracing::info!(count = tokens.len(), "Fetched boosted tokens");
        println!("{}", serde_json::to_string_pretty(&tokens)?);
        return Ok(());
    }

    // --- Copy trader: Solana RPC + decision oracle ---
    // The oracle is only consulted by the trade loop.
    let api_key = if trading {
        config.require_openai_key()?
    } else {
        config.openai_api_key.as_deref().unwrap_or_default()
    };
    let rpc = Arc::new(SolanaRpcClient::new(http.clone(), config.solana_rpc_url.as_str()));
    let oracle = Arc::new(OpenAiOracle::new(
        http.clone(),
        api_key,
        config.openai_base_url.as_str(),
        config.openai_model.as_str(),
    ));
    tracing::info!(
        rpc_url = %config.solana_rpc_url,
        model = %config.openai_model,
        "Clients configured"
    );

    let (descriptor_tx, mut descriptor_rx) = mpsc::channel::<CopyTradeDescriptor>(100);
    let mut copy_trader =
        CopyTrader::new(rpc, oracle, config.risk.clone()).with_descriptor_sink(descriptor_tx);

    for (wallet, win_rate) in &config.monitored_wallets {
        copy_trader.admit(wallet, *win_rate);
    }
    if copy_trader.monitored_wallets().is_empty() {
        tracing::warn!("No wallets admitted, set MONITORED_WALLETS=address:win_rate,...");
    }

    // Descriptors are the end of the line: log them.
    tokio::spawn(async move {
        while let Some(descriptor) = descriptor_rx.recv().await {
            match serde_json::to_string(&descriptor) {
                Ok(json) => tracing::info!(descriptor = %json, "Copy-trade descriptor"),
                Err(e) => tracing::error!(error = %e, "Failed to serialize descriptor"),
            }
        }
    });

    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Shutdown requested");
                let _ = stop_tx.send(true);
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for Ctrl-C; run until killed");
                std::future::pending::<()>().await;
            }
        }
    });

    // --- Browser: optional WebDriver session ---
    let navigator = match &config.webdriver_url {
        Some(url) => {
            let driver = WebDriverBrowser::connect(url).await?;
            Some(WebNavigator::new(
                WebAutomation::new(Box::new(driver)),
                config.web_username.clone(),
                config.web_password.clone(),
            ))
        }
        None => None,
    };

    let mut framework = Framework::new(copy_trader, navigator);

    match task.as_str() {
        // learn <url> <description...>
        "learn" => {
            let url = args.get(1).map(String::as_str).unwrap_or_default();
            let description = args.get(2..).unwrap_or_default().join(" ");
            let learned = framework.learn_new_pattern(url, &description).await;
            tracing::info!(url = %url, learned, "Learn task finished");
        }
        // extract <url> <key=selector...>
        "extract" => {
            let url = args.get(1).map(String::as_str).unwrap_or_default();
            let selectors = parse_selectors(args.get(2..).unwrap_or_default());
            if let Some(data) = framework.extract_page(url, &selectors).await {
                println!("{}", serde_json::to_string_pretty(&data)?);
            }
        }
        _ => {
            let outcome = framework.execute_task(&task, stop_rx).await;
            tracing::info!(
                task = %task,
                web_actions = ?outcome.web_actions,
                descriptors = ?outcome.descriptors,
                "Task finished"
            );
        }
    }

    framework.shutdown().await;
    Ok(())
}

/// `key=selector` arguments; malformed ones are skipped with a warning.
fn parse_selectors(args: &[String]) -> BTreeMap<String, String> {
    args.iter()
        .filter_map(|arg| match arg.split_once('=') {
            Some((key, selector)) => Some((key.to_string(), selector.to_string())),
            None => {
                tracing::warn!(arg = %arg, "Ignoring selector argument without '='");
                None
            }
        })
        .collect()
}

fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();
}
