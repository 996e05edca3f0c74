//! Network selection.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::{Error, Result};

/// The Hyperliquid network an action is signed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    #[default]
    Mainnet,
    Testnet,
}

impl Chain {
    /// Phantom agent `source` for L1 signing.
    pub fn agent_source(&self) -> &'static str {
        match self {
            Chain::Mainnet => "a",
            Chain::Testnet => "b",
        }
    }

    /// Value of the `hyperliquidChain` field injected into user-signed actions.
    pub fn hyperliquid_chain(&self) -> &'static str {
        match self {
            Chain::Mainnet => "Mainnet",
            Chain::Testnet => "Testnet",
        }
    }

    pub fn is_mainnet(&self) -> bool {
        matches!(self, Chain::Mainnet)
    }

    /// Default REST endpoint for this network.
    pub fn api_url(&self) -> &'static str {
        match self {
            Chain::Mainnet => "https://api.hyperliquid.xyz",
            Chain::Testnet => "https://api.hyperliquid-testnet.xyz",
        }
    }
}

impl FromStr for Chain {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Chain::Mainnet),
            "testnet" => Ok(Chain::Testnet),
            other => Err(Error::Config {
                message: format!("unknown network '{}', expected mainnet or testnet", other),
            }),
        }
    }
}

impl std::fmt::Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.hyperliquid_chain())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_labels() {
        assert_eq!(Chain::Mainnet.agent_source(), "a");
        assert_eq!(Chain::Testnet.agent_source(), "b");
        assert_eq!(Chain::Mainnet.hyperliquid_chain(), "Mainnet");
        assert_eq!(Chain::Testnet.hyperliquid_chain(), "Testnet");
    }

    #[test]
    fn test_chain_from_str() {
        assert_eq!("Mainnet".parse::<Chain>().unwrap(), Chain::Mainnet);
        assert_eq!(" testnet ".parse::<Chain>().unwrap(), Chain::Testnet);
        assert!("devnet".parse::<Chain>().is_err());
    }
}
