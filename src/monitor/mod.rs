pub mod wallet_monitor;

pub use wallet_monitor::{WalletMonitor, SIGNATURE_WINDOW};
