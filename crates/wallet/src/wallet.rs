//! Trading wallet management for action signing.
//!
//! Provides key loading from environment variables and exposes the key as
//! both signing backends of the core pipeline.

use alloy_primitives::Address;
use anyhow::{Context, Result};
use hyperliquid_core::signing::{
    ActionCategory, LocalSigner, LocalWallet, RawHashSigner, SignedAction, SigningContext,
};
use hyperliquid_core::types::{address_to_wire, Action, Signature};

/// Environment variable holding the hex private key.
pub const PRIVATE_KEY_ENV: &str = "HYPERLIQUID_PRIVATE_KEY";

/// A trading wallet with private key access for signing actions.
///
/// The wallet can be loaded from an environment variable or directly
/// from a hex-encoded private key.
#[derive(Clone)]
pub struct TradingWallet {
    signer: LocalSigner,
    address: Address,
}

impl TradingWallet {
    /// Load wallet from the `HYPERLIQUID_PRIVATE_KEY` environment variable.
    ///
    /// The private key should be a 64-character hex string, optionally
    /// prefixed with "0x".
    ///
    /// # Errors
    ///
    /// Returns an error if the environment variable is not set or
    /// if the private key format is invalid.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let private_key = std::env::var(PRIVATE_KEY_ENV)
            .with_context(|| format!("{} environment variable not set", PRIVATE_KEY_ENV))?;

        Self::from_private_key(&private_key)
    }

    /// Create a wallet from a hex-encoded private key.
    ///
    /// # Errors
    ///
    /// Returns an error if the private key format is invalid.
    pub fn from_private_key(key: &str) -> Result<Self> {
        let signer = LocalSigner::from_hex(key)
            .context("Invalid private key format - expected 64 hex characters")?;
        let address = signer.address();

        Ok(Self { signer, address })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Lowercase hex address, as it appears inside actions.
    pub fn address_string(&self) -> String {
        address_to_wire(&self.address)
    }

    /// Raw-hash backend for this key.
    pub fn local_signer(&self) -> &LocalSigner {
        &self.signer
    }

    /// Typed-data backend for this key.
    pub fn local_wallet(&self) -> LocalWallet {
        LocalWallet::new(self.signer.clone())
    }

    /// Signs an action, inferring its category from the `type` tag.
    pub fn sign_action(
        &self,
        ctx: &SigningContext,
        action: &Action,
        nonce: u64,
    ) -> Result<SignedAction> {
        let category = ActionCategory::of(action);
        ctx.sign(&self.signer, action, nonce, category)
            .with_context(|| format!("Failed to sign {:?} action", action.action_type()))
    }
}

impl RawHashSigner for TradingWallet {
    fn address(&self) -> Address {
        self.address
    }

    fn sign_hash(&self, hash: &[u8]) -> hyperliquid_core::Result<Signature> {
        self.signer.sign_hash(hash)
    }
}

impl std::fmt::Debug for TradingWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never expose the private key in debug output
        f.debug_struct("TradingWallet")
            .field("address", &self.address_string())
            .finish()
    }
}
