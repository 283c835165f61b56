use chrono::{DateTime, Utc};
use serde::Serialize;

use super::browser::{WebAction, WebAutomation};

/// A script that ran against a page.
#[derive(Debug, Clone, Serialize)]
pub struct LearnedPattern {
    pub url: String,
    pub actions: Vec<WebAction>,
    pub learned_at: DateTime<Utc>,
}

/// Turns task descriptions into action scripts and remembers which
/// scripts were run where.
pub struct WebNavigator {
    automation: WebAutomation,
    username: String,
    password: String,
    history: Vec<LearnedPattern>,
}

impl WebNavigator {
    pub fn new(automation: WebAutomation, username: String, password: String) -> Self {
        Self {
            automation,
            username,
            password,
            history: Vec::new(),
        }
    }

    pub fn automation(&self) -> &WebAutomation {
        &self.automation
    }

    pub fn history(&self) -> &[LearnedPattern] {
        &self.history
    }

    /// Canned scripts keyed on words in `task`. Login wins over trade;
    /// anything else yields no actions.
    pub fn generate_actions_for_task(&self, task: &str) -> Vec<WebAction> {
        let task = task.to_lowercase();

        if task.contains("login") {
            vec![
                WebAction::type_text("#username", self.username.as_str()),
                WebAction::type_text("#password", self.password.as_str()),
                WebAction::click("#login-button"),
            ]
        } else if task.contains("trade") {
            vec![
                WebAction::click("#trading-pair-selector"),
                WebAction::type_text("#amount-input", "1.0"),
                WebAction::click("#execute-trade-button"),
            ]
        } else {
            Vec::new()
        }
    }

    /// Open `url`, run `actions`, and record the pattern. Returns `false`
    /// if the page could not be opened.
    pub async fn learn_website_pattern(&mut self, url: &str, actions: Vec<WebAction>) -> bool {
        if let Err(e) = self.automation.navigate(url).await {
            tracing::warn!(error = %e, url = %url, "Failed to learn website pattern");
            return false;
        }

        let succeeded = self.automation.execute_actions(&actions).await;
        tracing::info!(
            url = %url,
            actions = actions.len(),
            succeeded,
            "Website pattern recorded"
        );

        self.history.push(LearnedPattern {
            url: url.to_string(),
            actions,
            learned_at: Utc::now(),
        });
        true
    }
}
