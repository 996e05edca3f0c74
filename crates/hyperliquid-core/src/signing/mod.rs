//! Signing pipeline for Hyperliquid exchange actions.
//!
//! Actions are hashed and signed along one of two paths:
//!
//! ```text
//! Action ──► wire::encode ──► action_hash ──► Agent{source, connectionId} ─┐
//!   (L1)                                                                  │
//!                                                                         ▼
//! Action ──► with_chain_fields ──► HyperliquidTransaction:* ──► TypedDataDocument
//!   (user-signed)                                                         │
//!                                                    ┌────────────────────┴─────┐
//!                                                    ▼                          ▼
//!                                         RawHashSigner(signing_hash)  TypedDataSigner(document)
//!                                                    └──────────► Signature ◄───┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use hyperliquid_core::signing::{ActionCategory, LocalSigner, SigningContext};
//! use hyperliquid_core::types::{Action, Chain};
//!
//! let signer = LocalSigner::from_hex("0x...")?;
//! let ctx = SigningContext::new(Chain::Mainnet);
//!
//! let action = Action::typed("noop");
//! let signed = ctx.sign(&signer, &action, nonce, ActionCategory::L1)?;
//! ```

pub mod action_hash;
pub mod context;
pub mod domain;
pub mod eip712;
pub mod multisig;
pub mod signer;
pub mod typed_data;

pub use action_hash::{action_hash, hash_encoded, value_hash};
pub use context::{ActionCategory, PreparedAction, SignedAction, SigningContext};
pub use domain::{
    Eip712Domain, L1_CHAIN_ID, L1_DOMAIN, SIGNATURE_CHAIN_ID, USER_SIGNED_CHAIN_ID,
    USER_SIGNED_DOMAIN,
};
pub use eip712::{Eip712Type, TypedField};
pub use signer::{LocalSigner, LocalWallet, RawHashSigner, TypedDataSigner};
pub use typed_data::{with_chain_fields, PrimaryType, TypedDataDocument};
