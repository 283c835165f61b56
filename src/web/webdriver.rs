use std::time::Duration;

use async_trait::async_trait;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};

use super::browser::{BrowserDriver, BrowserError};

/// How long `wait_for_selector` polls before giving up.
pub const DEFAULT_SELECTOR_TIMEOUT: Duration = Duration::from_secs(10);

/// `BrowserDriver` over a W3C WebDriver session (chromedriver, geckodriver).
pub struct WebDriverBrowser {
    client: Client,
    selector_timeout: Duration,
}

impl WebDriverBrowser {
    /// Open a new session on the WebDriver server at `webdriver_url`.
    pub async fn connect(webdriver_url: &str) -> Result<Self, BrowserError> {
        let client = ClientBuilder::native()
            .connect(webdriver_url)
            .await
            .map_err(|e| BrowserError::Driver(format!("{webdriver_url}: {e}")))?;

        tracing::info!(webdriver = %webdriver_url, "WebDriver session opened");
        Ok(Self {
            client,
            selector_timeout: DEFAULT_SELECTOR_TIMEOUT,
        })
    }

    pub fn with_selector_timeout(mut self, timeout: Duration) -> Self {
        self.selector_timeout = timeout;
        self
    }
}

fn selector_error(selector: &str, e: CmdError) -> BrowserError {
    BrowserError::Selector {
        selector: selector.to_string(),
        reason: e.to_string(),
    }
}

#[async_trait]
impl BrowserDriver for WebDriverBrowser {
    async fn navigate(&self, url: &str) -> Result<(), BrowserError> {
        self.client
            .goto(url)
            .await
            .map_err(|e| BrowserError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }

    async fn click(&self, selector: &str) -> Result<(), BrowserError> {
        let element = self
            .client
            .find(Locator::Css(selector))
            .await
            .map_err(|e| selector_error(selector, e))?;
        element.click().await.map_err(|e| selector_error(selector, e))
    }

    async fn fill(&self, selector: &str, value: &str) -> Result<(), BrowserError> {
        let element = self
            .client
            .find(Locator::Css(selector))
            .await
            .map_err(|e| selector_error(selector, e))?;
        element.clear().await.map_err(|e| selector_error(selector, e))?;
        element
            .send_keys(value)
            .await
            .map_err(|e| selector_error(selector, e))
    }

    async fn scroll_by(&self, pixels: i64) -> Result<(), BrowserError> {
        self.client
            .execute(&format!("window.scrollBy(0, {pixels});"), Vec::new())
            .await
            .map(|_| ())
            .map_err(|e| BrowserError::Driver(e.to_string()))
    }

    async fn wait_for_selector(&self, selector: &str) -> Result<(), BrowserError> {
        self.client
            .wait()
            .at_most(self.selector_timeout)
            .for_element(Locator::Css(selector))
            .await
            .map(|_| ())
            .map_err(|e| selector_error(selector, e))
    }

    async fn text_content(&self, selector: &str) -> Result<Option<String>, BrowserError> {
        let matches = self
            .client
            .find_all(Locator::Css(selector))
            .await
            .map_err(|e| selector_error(selector, e))?;

        match matches.first() {
            Some(element) => element
                .text()
                .await
                .map(Some)
                .map_err(|e| selector_error(selector, e)),
            None => Ok(None),
        }
    }

    async fn close(&self) -> Result<(), BrowserError> {
        self.client
            .clone()
            .close()
            .await
            .map_err(|e| BrowserError::Driver(e.to_string()))
    }
}
