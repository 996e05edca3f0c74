//! Hyperliquid Signer
//!
//! Root crate for integration tests, benchmarks and demos. Use the member
//! crates directly:
//!
//! - `hyperliquid-core`: action model, wire encoding, hashing, typed data, signing
//! - `wallet`: key loading and the JSON-RPC wallet bridge

pub use hyperliquid_core as core;
pub use wallet;
