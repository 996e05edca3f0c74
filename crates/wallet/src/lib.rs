//! Key management and wallet bridges
//!
//! Loads trading keys for in-process signing and forwards typed-data
//! documents to external wallets over JSON-RPC.

pub mod rpc;
pub mod wallet;

pub use rpc::RpcWallet;
pub use wallet::{TradingWallet, PRIVATE_KEY_ENV};
