pub mod copy_trader;

pub use copy_trader::CopyTrader;
