//! Client order ids.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::{Error, Result};

/// A 128-bit client order id, carried on the wire as `0x` + 32 hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cloid([u8; 16]);

impl Cloid {
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    pub fn from_u128(value: u128) -> Self {
        Self(value.to_be_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// The wire form used inside actions.
    pub fn to_raw(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl FromStr for Cloid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let digits = s.strip_prefix("0x").ok_or_else(|| {
            Error::UnsupportedValue(format!("cloid {} is not 0x-prefixed", s))
        })?;
        if digits.len() != 32 {
            return Err(Error::UnsupportedValue(format!(
                "cloid {} must be 16 bytes (32 hex digits)",
                s
            )));
        }
        let mut bytes = [0u8; 16];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| Error::UnsupportedValue(format!("cloid {}: {}", s, e)))?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Cloid {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Cloid> for String {
    fn from(cloid: Cloid) -> Self {
        cloid.to_raw()
    }
}

impl std::fmt::Display for Cloid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_raw())
    }
}
