//! Signing backends.
//!
//! [`RawHashSigner`] signs a precomputed 32-byte digest in process.
//! [`TypedDataSigner`] hands a typed-data document to an external agent
//! (browser wallet, hardware wallet, remote signer) that recomputes the
//! digest itself. For the same key and action both yield identical
//! signatures.

use std::str::FromStr;

use alloy_primitives::{Address, B256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;

use super::typed_data::TypedDataDocument;
use crate::types::Signature;
use crate::{Error, Result};

/// Signs raw 32-byte digests.
pub trait RawHashSigner: Send + Sync {
    fn address(&self) -> Address;

    /// Recoverable secp256k1 signature over `hash`. Fails unless `hash` is
    /// exactly 32 bytes.
    fn sign_hash(&self, hash: &[u8]) -> Result<Signature>;
}

/// Signs EIP-712 typed-data documents, returning `0x` r‖s‖v hex.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TypedDataSigner: Send + Sync {
    fn address(&self) -> Address;

    async fn sign_typed_data(&self, document: &TypedDataDocument) -> Result<String>;
}

/// In-process private key signer.
#[derive(Clone)]
pub struct LocalSigner {
    signer: PrivateKeySigner,
}

impl LocalSigner {
    pub fn new(signer: PrivateKeySigner) -> Self {
        Self { signer }
    }

    /// Create a signer from a hex private key, with or without `0x`.
    pub fn from_hex(key: &str) -> Result<Self> {
        let key_clean = key.trim().trim_start_matches("0x");
        let signer = PrivateKeySigner::from_str(key_clean)
            .map_err(|e| Error::signing(format!("invalid private key: {}", e)))?;
        Ok(Self { signer })
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn inner(&self) -> &PrivateKeySigner {
        &self.signer
    }
}

impl RawHashSigner for LocalSigner {
    fn address(&self) -> Address {
        self.signer.address()
    }

    fn sign_hash(&self, hash: &[u8]) -> Result<Signature> {
        if hash.len() != 32 {
            return Err(Error::signing(format!(
                "expected a 32-byte digest, got {} bytes",
                hash.len()
            )));
        }
        let digest = B256::from_slice(hash);

        let signature = self
            .signer
            .sign_hash_sync(&digest)
            .map_err(|e| Error::signing(e.to_string()))?;

        Ok(Signature::from(signature))
    }
}

impl std::fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSigner")
            .field("address", &format!("{:?}", self.address()))
            .finish()
    }
}

/// A typed-data signer backed by a local key.
///
/// It behaves like an external wallet: the document is round-tripped through
/// its JSON form and the digest is recomputed from what was received.
#[derive(Clone, Debug)]
pub struct LocalWallet {
    signer: LocalSigner,
}

impl LocalWallet {
    pub fn new(signer: LocalSigner) -> Self {
        Self { signer }
    }

    pub fn from_hex(key: &str) -> Result<Self> {
        Ok(Self::new(LocalSigner::from_hex(key)?))
    }
}

#[async_trait]
impl TypedDataSigner for LocalWallet {
    fn address(&self) -> Address {
        self.signer.address()
    }

    async fn sign_typed_data(&self, document: &TypedDataDocument) -> Result<String> {
        let received: TypedDataDocument = serde_json::from_value(document.to_json()?)?;
        let hash = received.signing_hash()?;
        Ok(self.signer.sign_hash(hash.as_slice())?.to_hex())
    }
}
