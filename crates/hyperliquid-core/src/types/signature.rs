//! Recoverable ECDSA signatures in the exchange's `{r, s, v}` form.

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::{Error, Result};

/// A secp256k1 signature with `v` normalized to 27 or 28.
///
/// Serializes as `{"r": "0x..", "s": "0x..", "v": 27}`; the compact form is
/// the 65-byte hex string `0x r ‖ s ‖ v`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "SignatureParts", into = "SignatureParts")]
pub struct Signature {
    r: B256,
    s: B256,
    v: u8,
}

impl Signature {
    /// Length of the compact `r ‖ s ‖ v` encoding.
    pub const LEN: usize = 65;

    pub fn new(r: B256, s: B256, v: u8) -> Result<Self> {
        if v != 27 && v != 28 {
            return Err(Error::InvalidSignatureEncoding(format!(
                "v must be 27 or 28, got {}",
                v
            )));
        }
        Ok(Self { r, s, v })
    }

    pub fn r(&self) -> B256 {
        self.r
    }

    pub fn s(&self) -> B256 {
        self.s
    }

    /// Recovery id offset by 27.
    pub fn v(&self) -> u8 {
        self.v
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != Self::LEN {
            return Err(Error::InvalidSignatureEncoding(format!(
                "expected {} bytes, got {}",
                Self::LEN,
                bytes.len()
            )));
        }
        Self::new(
            B256::from_slice(&bytes[0..32]),
            B256::from_slice(&bytes[32..64]),
            bytes[64],
        )
    }

    pub fn to_bytes(&self) -> [u8; 65] {
        let mut bytes = [0u8; 65];
        bytes[0..32].copy_from_slice(self.r.as_slice());
        bytes[32..64].copy_from_slice(self.s.as_slice());
        bytes[64] = self.v;
        bytes
    }

    /// Parses the canonical form produced by [`Signature::to_hex`]: `0x`
    /// followed by 130 lowercase hex digits.
    pub fn from_hex(s: &str) -> Result<Self> {
        let digits = s.strip_prefix("0x").ok_or_else(|| {
            Error::InvalidSignatureEncoding(format!("{}: missing 0x prefix", s))
        })?;
        if digits.bytes().any(|b| b.is_ascii_uppercase()) {
            return Err(Error::InvalidSignatureEncoding(format!(
                "{}: hex digits must be lowercase",
                s
            )));
        }
        let bytes = hex::decode(digits)
            .map_err(|e| Error::InvalidSignatureEncoding(format!("{}: {}", s, e)))?;
        Self::from_bytes(&bytes)
    }

    /// Lowercase `0x`-prefixed hex of `r ‖ s ‖ v`.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }

    /// Recovers the signing address for a 32-byte prehash.
    pub fn recover_address(&self, hash: &B256) -> Result<Address> {
        let signature = alloy_primitives::Signature::new(
            U256::from_be_bytes(self.r.0),
            U256::from_be_bytes(self.s.0),
            self.v == 28,
        );
        signature
            .recover_address_from_prehash(hash)
            .map_err(|e| Error::InvalidSignatureEncoding(format!("recovery failed: {}", e)))
    }
}

impl From<alloy_primitives::Signature> for Signature {
    fn from(signature: alloy_primitives::Signature) -> Self {
        Self {
            r: B256::from(signature.r().to_be_bytes::<32>()),
            s: B256::from(signature.s().to_be_bytes::<32>()),
            v: 27 + signature.v() as u8,
        }
    }
}

impl FromStr for Signature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// JSON shape of a signature inside an exchange request.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SignatureParts {
    r: String,
    s: String,
    v: u8,
}

impl From<Signature> for SignatureParts {
    fn from(signature: Signature) -> Self {
        Self {
            r: format!("0x{}", hex::encode(signature.r.as_slice())),
            s: format!("0x{}", hex::encode(signature.s.as_slice())),
            v: signature.v,
        }
    }
}

impl TryFrom<SignatureParts> for Signature {
    type Error = Error;

    fn try_from(parts: SignatureParts) -> Result<Self> {
        Signature::new(parse_word(&parts.r)?, parse_word(&parts.s)?, parts.v)
    }
}

/// Parses a hex word of at most 32 bytes, left-padding shorter values.
fn parse_word(s: &str) -> Result<B256> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    if digits.is_empty() || digits.len() > 64 {
        return Err(Error::InvalidSignatureEncoding(format!(
            "{} is not a 32-byte hex word",
            s
        )));
    }
    let padded = format!("{:0>64}", digits);
    let mut word = [0u8; 32];
    hex::decode_to_slice(&padded, &mut word)
        .map_err(|e| Error::InvalidSignatureEncoding(format!("{}: {}", s, e)))?;
    Ok(B256::from(word))
}
