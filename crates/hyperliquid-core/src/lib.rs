//! Hyperliquid Core Library
//!
//! Action encoding, hashing, EIP-712 typed data and signing for the
//! Hyperliquid exchange.

pub mod actions;
pub mod config;
pub mod error;
pub mod payload;
pub mod signing;
pub mod types;
pub mod wire;

pub use error::{Error, Result};
pub use payload::ExchangePayload;
pub use signing::{
    ActionCategory, LocalSigner, LocalWallet, PreparedAction, RawHashSigner, SignedAction,
    SigningContext, TypedDataDocument, TypedDataSigner,
};
pub use types::{Action, ActionValue, Chain, Signature};
