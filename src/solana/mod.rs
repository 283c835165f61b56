pub mod rpc_client;
pub mod types;

pub use rpc_client::{ChainRpc, SolanaRpcClient};
