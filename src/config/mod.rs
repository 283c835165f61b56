use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::ConfigError;

const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_DEXSCREENER_URL: &str = "https://api.dexscreener.com";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Policy governing which wallets qualify for monitoring and how often
/// they are polled. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskConfig {
    min_win_rate: Decimal,
    polling_interval: Duration,
}

impl RiskConfig {
    /// `min_win_rate` must lie in [0, 1]; `polling_interval_secs` must be
    /// finite and strictly positive.
    pub fn new(min_win_rate: Decimal, polling_interval_secs: f64) -> Result<Self, ConfigError> {
        if min_win_rate < Decimal::ZERO || min_win_rate > Decimal::ONE {
            return Err(ConfigError::Invalid {
                name: "MIN_WIN_RATE",
                reason: format!("{min_win_rate} is outside [0, 1]"),
            });
        }
        if !polling_interval_secs.is_finite() || polling_interval_secs <= 0.0 {
            return Err(ConfigError::Invalid {
                name: "POLLING_INTERVAL_SECS",
                reason: format!("{polling_interval_secs} is not a positive number"),
            });
        }

        let polling_interval =
            Duration::try_from_secs_f64(polling_interval_secs).map_err(|e| ConfigError::Invalid {
                name: "POLLING_INTERVAL_SECS",
                reason: format!("{polling_interval_secs}: {e}"),
            })?;

        Ok(Self {
            min_win_rate,
            polling_interval,
        })
    }

    pub fn min_win_rate(&self) -> Decimal {
        self.min_win_rate
    }

    pub fn polling_interval(&self) -> Duration {
        self.polling_interval
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub solana_rpc_url: String,
    /// Per-request timeout for every outbound HTTP call.
    pub http_timeout: Duration,

    // Decision oracle (optional, only the trade task needs it)
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,

    pub risk: RiskConfig,
    /// Wallets to admit at startup, with their reported win rates.
    pub monitored_wallets: Vec<(String, Decimal)>,

    pub dexscreener_base_url: String,
    pub web_username: String,
    pub web_password: String,
    /// WebDriver server for the browser tasks; unset means no browser.
    pub webdriver_url: Option<String>,

    pub metrics_addr: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let min_win_rate = Decimal::from_str(
            &env::var("MIN_WIN_RATE").unwrap_or_else(|_| "0.6".into()),
        )
        .map_err(|e| ConfigError::Invalid {
            name: "MIN_WIN_RATE",
            reason: e.to_string(),
        })?;

        let polling_interval_secs: f64 = env::var("POLLING_INTERVAL_SECS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .map_err(|e: std::num::ParseFloatError| ConfigError::Invalid {
                name: "POLLING_INTERVAL_SECS",
                reason: e.to_string(),
            })?;

        let monitored_wallets =
            parse_wallet_list(&env::var("MONITORED_WALLETS").unwrap_or_default())?;

        let http_timeout = parse_http_timeout(env::var("HTTP_TIMEOUT_SECS").ok().as_deref())?;

        Ok(Self {
            solana_rpc_url: env::var("SOLANA_RPC_URL").unwrap_or_else(|_| DEFAULT_RPC_URL.into()),
            http_timeout,

            openai_api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            openai_base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.into()),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_OPENAI_MODEL.into()),

            risk: RiskConfig::new(min_win_rate, polling_interval_secs)?,
            monitored_wallets,

            dexscreener_base_url: env::var("DEXSCREENER_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_DEXSCREENER_URL.into()),
            web_username: env::var("WEB_USERNAME").unwrap_or_else(|_| "USERNAME".into()),
            web_password: env::var("WEB_PASSWORD").unwrap_or_else(|_| "PASSWORD".into()),
            webdriver_url: env::var("WEBDRIVER_URL").ok().filter(|u| !u.is_empty()),

            metrics_addr: env::var("METRICS_ADDR").ok().filter(|a| !a.is_empty()),
        })
    }

    /// The oracle key, or an error naming the missing variable.
    pub fn require_openai_key(&self) -> Result<&str, ConfigError> {
        self.openai_api_key
            .as_deref()
            .ok_or(ConfigError::Missing("OPENAI_API_KEY"))
    }
}

/// Whole seconds, at least one. `None` gives the default.
pub fn parse_http_timeout(raw: Option<&str>) -> Result<Duration, ConfigError> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS));
    };

    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        Ok(_) => Err(ConfigError::Invalid {
            name: "HTTP_TIMEOUT_SECS",
            reason: "must be at least 1".into(),
        }),
        Err(e) => Err(ConfigError::Invalid {
            name: "HTTP_TIMEOUT_SECS",
            reason: e.to_string(),
        }),
    }
}

/// Parse `addr:win_rate,addr:win_rate` into pairs. Blank entries are skipped.
pub fn parse_wallet_list(raw: &str) -> Result<Vec<(String, Decimal)>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|entry| {
            let (address, rate) = entry.split_once(':').ok_or_else(|| ConfigError::Invalid {
                name: "MONITORED_WALLETS",
                reason: format!("expected address:win_rate, got {entry:?}"),
            })?;
            let rate = Decimal::from_str(rate.trim()).map_err(|e| ConfigError::Invalid {
                name: "MONITORED_WALLETS",
                reason: format!("bad win rate for {}: {e}", address.trim()),
            })?;
            Ok((address.trim().to_string(), rate))
        })
        .collect()
}
