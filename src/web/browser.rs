use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pause after each action unless the action says otherwise.
pub const DEFAULT_WAIT_AFTER: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("selector {selector} failed: {reason}")]
    Selector { selector: String, reason: String },

    #[error("invalid action: {0}")]
    InvalidAction(String),

    #[error("browser driver error: {0}")]
    Driver(String),
}

/// A scripted browser. Implemented over whatever automation engine is
/// available; nothing here depends on a specific one.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    async fn navigate(&self, url: &str) -> Result<(), BrowserError>;
    async fn click(&self, selector: &str) -> Result<(), BrowserError>;
    async fn fill(&self, selector: &str, value: &str) -> Result<(), BrowserError>;
    async fn scroll_by(&self, pixels: i64) -> Result<(), BrowserError>;
    async fn wait_for_selector(&self, selector: &str) -> Result<(), BrowserError>;
    /// Text of the first element matching `selector`, `None` if nothing matches.
    async fn text_content(&self, selector: &str) -> Result<Option<String>, BrowserError>;
    async fn close(&self) -> Result<(), BrowserError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Click,
    Type,
    Scroll,
    WaitForSelector,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActionKind::Click => "click",
            ActionKind::Type => "type",
            ActionKind::Scroll => "scroll",
            ActionKind::WaitForSelector => "wait_for_selector",
        };
        f.write_str(s)
    }
}

/// One step of a scripted page interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebAction {
    pub action: ActionKind,
    pub selector: String,
    /// Text to type, or pixels to scroll.
    pub value: Option<String>,
    pub wait_after: Duration,
}

impl WebAction {
    pub fn click(selector: impl Into<String>) -> Self {
        Self::new(ActionKind::Click, selector, None)
    }

    pub fn type_text(selector: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(ActionKind::Type, selector, Some(value.into()))
    }

    pub fn scroll(pixels: i64) -> Self {
        Self::new(ActionKind::Scroll, "", Some(pixels.to_string()))
    }

    pub fn wait_for(selector: impl Into<String>) -> Self {
        Self::new(ActionKind::WaitForSelector, selector, None)
    }

    fn new(action: ActionKind, selector: impl Into<String>, value: Option<String>) -> Self {
        Self {
            action,
            selector: selector.into(),
            value,
            wait_after: DEFAULT_WAIT_AFTER,
        }
    }

    pub fn with_wait_after(mut self, wait_after: Duration) -> Self {
        self.wait_after = wait_after;
        self
    }
}

/// Runs action scripts and scrapes text through a `BrowserDriver`.
pub struct WebAutomation {
    driver: Box<dyn BrowserDriver>,
}

impl WebAutomation {
    pub fn new(driver: Box<dyn BrowserDriver>) -> Self {
        Self { driver }
    }

    pub async fn navigate(&self, url: &str) -> Result<(), BrowserError> {
        self.driver.navigate(url).await
    }

    /// Run `actions` in order. A failing action is logged and the script
    /// moves on. Returns how many actions succeeded.
    pub async fn execute_actions(&self, actions: &[WebAction]) -> usize {
        let mut succeeded = 0;

        for action in actions {
            match self.execute_action(action).await {
                Ok(()) => succeeded += 1,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        action = %action.action,
                        selector = %action.selector,
                        "Web action failed"
                    );
                }
            }

            tokio::time::sleep(action.wait_after).await;
        }

        succeeded
    }

    async fn execute_action(&self, action: &WebAction) -> Result<(), BrowserError> {
        match action.action {
            ActionKind::Click => self.driver.click(&action.selector).await,
            ActionKind::Type => {
                let value = action.value.as_deref().ok_or_else(|| {
                    BrowserError::InvalidAction(format!("type on {} has no value", action.selector))
                })?;
                self.driver.fill(&action.selector, value).await
            }
            ActionKind::Scroll => {
                let raw = action.value.as_deref().unwrap_or_default();
                let pixels: i64 = raw.trim().parse().map_err(|_| {
                    BrowserError::InvalidAction(format!("scroll amount {raw:?} is not a number"))
                })?;
                self.driver.scroll_by(pixels).await
            }
            ActionKind::WaitForSelector => self.driver.wait_for_selector(&action.selector).await,
        }
    }

    /// Text for each `key -> selector` pair. Keys whose selector matches
    /// nothing, or fails, are left out.
    pub async fn extract_data(
        &self,
        selectors: &BTreeMap<String, String>,
    ) -> BTreeMap<String, String> {
        let mut data = BTreeMap::new();

        for (key, selector) in selectors {
            match self.driver.text_content(selector).await {
                Ok(Some(text)) => {
                    data.insert(key.clone(), text);
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(error = %e, key = %key, "Failed to extract page data");
                }
            }
        }

        data
    }

    pub async fn close(&self) -> Result<(), BrowserError> {
        self.driver.close().await
    }
}
