pub mod browser;
pub mod data_client;
pub mod navigator;
pub mod types;
pub mod webdriver;

pub use browser::{ActionKind, BrowserDriver, BrowserError, WebAction, WebAutomation};
pub use data_client::{DataClientError, DexScreenerClient};
pub use navigator::{LearnedPattern, WebNavigator};
pub use types::{BoostedToken, TokenLink};
pub use webdriver::WebDriverBrowser;
