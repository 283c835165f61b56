pub mod config;
pub mod errors;
pub mod execution;
pub mod framework;
pub mod metrics;
pub mod models;
pub mod monitor;
pub mod oracle;
pub mod solana;
pub mod web;
