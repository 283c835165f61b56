use std::collections::BTreeMap;

use tokio::sync::watch;

use crate::execution::CopyTrader;
use crate::web::WebNavigator;

/// What a task ended up doing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskOutcome {
    /// Web actions that succeeded, if the task had a web part.
    pub web_actions: Option<usize>,
    /// Descriptors built before the copy trader stopped, if the task traded.
    pub descriptors: Option<u64>,
}

/// Routes free-text tasks to the browser and the copy trader.
pub struct Framework {
    copy_trader: CopyTrader,
    navigator: Option<WebNavigator>,
}

impl Framework {
    pub fn new(copy_trader: CopyTrader, navigator: Option<WebNavigator>) -> Self {
        Self {
            copy_trader,
            navigator,
        }
    }

    pub fn copy_trader_mut(&mut self) -> &mut CopyTrader {
        &mut self.copy_trader
    }

    /// A task mentioning "web" runs the matching browser script; one
    /// mentioning "trade" runs the copy trader until `stop`. Both may apply,
    /// web first.
    pub async fn execute_task(&mut self, task: &str, stop: watch::Receiver<bool>) -> TaskOutcome {
        let lower = task.to_lowercase();
        let mut outcome = TaskOutcome::default();

        if lower.contains("web") {
            match &self.navigator {
                Some(nav) => {
                    let actions = nav.generate_actions_for_task(task);
                    outcome.web_actions = Some(nav.automation().execute_actions(&actions).await);
                }
                None => {
                    tracing::warn!(task = %task, "No browser driver configured, skipping web part");
                }
            }
        }

        if lower.contains("trade") {
            outcome.descriptors = Some(self.copy_trader.run(stop).await);
        }

        outcome
    }

    /// Generate the script for `description` and learn it on `url`.
    pub async fn learn_new_pattern(&mut self, url: &str, description: &str) -> bool {
        let Some(nav) = self.navigator.as_mut() else {
            tracing::warn!(url = %url, "No browser driver configured, cannot learn pattern");
            return false;
        };

        let actions = nav.generate_actions_for_task(description);
        nav.learn_website_pattern(url, actions).await
    }

    /// Open `url` and scrape the text behind each `key -> selector` pair.
    /// `None` when there is no browser or the page cannot be opened.
    pub async fn extract_page(
        &self,
        url: &str,
        selectors: &BTreeMap<String, String>,
    ) -> Option<BTreeMap<String, String>> {
        let Some(nav) = self.navigator.as_ref() else {
            tracing::warn!(url = %url, "No browser driver configured, cannot extract");
            return None;
        };

        if let Err(e) = nav.automation().navigate(url).await {
            tracing::warn!(error = %e, url = %url, "Failed to open page for extraction");
            return None;
        }
        Some(nav.automation().extract_data(selectors).await)
    }

    /// Release the browser session, if any.
    pub async fn shutdown(&self) {
        if let Some(nav) = &self.navigator {
            if let Err(e) = nav.automation().close().await {
                tracing::warn!(error = %e, "Failed to close browser session");
            }
        }
    }
}
