//! Configuration management for the signing pipeline.

use crate::signing::SigningContext;
use crate::types::{parse_address, Chain};
use crate::{Error, Result};
use serde::Deserialize;
use std::env;
use std::path::Path;

const WALLET_RPC_URL_ENV: &str = "WALLET_RPC_URL";

/// Signing configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub network: Chain,
    /// Exchange REST endpoint. Defaults to the network's public API.
    pub api_url: String,
    /// Vault or sub-account the actions are signed on behalf of.
    pub vault_address: Option<String>,
    pub expires_after_ms: Option<u64>,
    /// JSON-RPC endpoint of an external wallet.
    pub wallet_rpc_url: Option<String>,
}

/// File/environment layer before defaults are applied.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    network: Option<String>,
    api_url: Option<String>,
    vault_address: Option<String>,
    expires_after_ms: Option<u64>,
    wallet_rpc_url: Option<String>,
}

impl RawConfig {
    fn resolve(self) -> Result<Config> {
        let network = match self.network.as_deref() {
            Some(s) if !s.trim().is_empty() => s.parse::<Chain>()?,
            _ => Chain::default(),
        };

        Ok(Config {
            network,
            api_url: non_empty(self.api_url).unwrap_or_else(|| network.api_url().to_string()),
            vault_address: non_empty(self.vault_address),
            expires_after_ms: self.expires_after_ms,
            wallet_rpc_url: non_empty(self.wallet_rpc_url),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl Config {
    /// Load configuration from environment variables.
    #[allow(clippy::result_large_err)]
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let expires_after_ms = match lookup("HYPERLIQUID_EXPIRES_AFTER_MS") {
            Some(raw) if !raw.trim().is_empty() => {
                Some(raw.trim().parse::<u64>().map_err(|_| Error::Config {
                    message: format!("HYPERLIQUID_EXPIRES_AFTER_MS must be an integer, got '{}'", raw),
                })?)
            }
            _ => None,
        };

        RawConfig {
            network: lookup("HYPERLIQUID_NETWORK"),
            api_url: lookup("HYPERLIQUID_API_URL"),
            vault_address: lookup("HYPERLIQUID_VAULT_ADDRESS"),
            expires_after_ms,
            wallet_rpc_url: lookup(WALLET_RPC_URL_ENV),
        }
        .resolve()
    }

    /// Load configuration from a file, overridden by `HYPERLIQUID_*` and
    /// `WALLET_RPC_URL` environment variables.
    #[allow(clippy::result_large_err)]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_file_with_lookup(path, |key| env::var(key).ok())
    }

    fn from_file_with_lookup(
        path: impl AsRef<Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let raw: RawConfig = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(config::Environment::with_prefix("HYPERLIQUID").try_parsing(true))
            .set_override_option(
                "wallet_rpc_url",
                non_empty(lookup(WALLET_RPC_URL_ENV)),
            )?
            .build()?
            .try_deserialize()?;
        raw.resolve()
    }

    /// Builds the signing context, validating the vault address.
    pub fn signing_context(&self) -> Result<SigningContext> {
        let mut ctx = SigningContext::new(self.network);
        if let Some(vault) = &self.vault_address {
            ctx = ctx.with_vault_address(parse_address(vault)?);
        }
        if let Some(expires_after) = self.expires_after_ms {
            ctx = ctx.with_expires_after(expires_after);
        }
        Ok(ctx)
    }

    /// Load configuration for testing (with defaults).
    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            network: Chain::Testnet,
            api_url: Chain::Testnet.api_url().to_string(),
            vault_address: None,
            expires_after_ms: None,
            wallet_rpc_url: None,
        }
    }
}
