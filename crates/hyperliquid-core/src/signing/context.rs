//! The signing pipeline: action → hash → typed data → signature.

use alloy_primitives::{Address, B256};
use tracing::{debug, warn};

use super::action_hash::action_hash;
use super::multisig;
use super::signer::{RawHashSigner, TypedDataSigner};
use super::typed_data::{with_chain_fields, PrimaryType, TypedDataDocument};
use crate::actions::user_signed;
use crate::types::{Action, Chain, Signature};
use crate::{Error, Result};

/// Action types whose vault qualifier lives inside the action itself.
const VAULT_EXEMPT_ACTIONS: [&str; 2] = ["usdClassTransfer", "sendAsset"];

/// How an action is signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionCategory {
    /// Hashed with nonce/vault/expiry and signed through the phantom agent.
    L1,
    /// Signed directly as a `HyperliquidTransaction:*` struct.
    UserSigned(PrimaryType),
}

impl ActionCategory {
    /// Category implied by the action's `type` tag.
    pub fn of(action: &Action) -> Self {
        action
            .action_type()
            .and_then(PrimaryType::from_action_type)
            .map(ActionCategory::UserSigned)
            .unwrap_or(ActionCategory::L1)
    }
}

/// Network, vault and expiry shared by every action signed in a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SigningContext {
    pub chain: Chain,
    pub vault_address: Option<Address>,
    pub expires_after: Option<u64>,
}

impl SigningContext {
    pub fn new(chain: Chain) -> Self {
        Self {
            chain,
            vault_address: None,
            expires_after: None,
        }
    }

    pub fn with_vault_address(mut self, vault_address: Address) -> Self {
        self.vault_address = Some(vault_address);
        self
    }

    pub fn with_expires_after(mut self, expires_after: u64) -> Self {
        self.expires_after = Some(expires_after);
        self
    }

    /// Hashes an action and renders the typed-data document for it.
    pub fn prepare(
        &self,
        action: &Action,
        nonce: u64,
        category: ActionCategory,
    ) -> Result<PreparedAction> {
        match category {
            ActionCategory::L1 => self.prepare_l1(action, nonce),
            ActionCategory::UserSigned(PrimaryType::SendMultiSig) => {
                multisig::prepare_envelope(self, action, nonce)
            }
            ActionCategory::UserSigned(primary) => self.prepare_user_signed(primary, action, nonce),
        }
    }

    /// [`prepare`](Self::prepare) with the category taken from the action's type.
    pub fn prepare_action(&self, action: &Action, nonce: u64) -> Result<PreparedAction> {
        self.prepare(action, nonce, ActionCategory::of(action))
    }

    pub fn sign(
        &self,
        signer: &dyn RawHashSigner,
        action: &Action,
        nonce: u64,
        category: ActionCategory,
    ) -> Result<SignedAction> {
        self.prepare(action, nonce, category)?.sign(signer)
    }

    pub async fn sign_with_wallet(
        &self,
        wallet: &dyn TypedDataSigner,
        action: &Action,
        nonce: u64,
        category: ActionCategory,
    ) -> Result<SignedAction> {
        self.prepare(action, nonce, category)?
            .sign_with_wallet(wallet)
            .await
    }

    fn prepare_l1(&self, action: &Action, nonce: u64) -> Result<PreparedAction> {
        let connection_id = action_hash(
            action,
            nonce,
            self.vault_address.as_ref(),
            self.expires_after,
        )?;
        let document = TypedDataDocument::l1_agent(connection_id, self.chain);
        let signing_hash = document.signing_hash()?;

        debug!(
            action_type = ?action.action_type(),
            nonce,
            chain = %self.chain,
            connection_id = %connection_id,
            "Prepared L1 action"
        );

        Ok(PreparedAction {
            action: action.clone(),
            nonce,
            vault_address: self.posted_vault(action),
            expires_after: self.expires_after,
            document,
            signing_hash,
            connection_id: Some(connection_id),
        })
    }

    fn prepare_user_signed(
        &self,
        primary: PrimaryType,
        action: &Action,
        nonce: u64,
    ) -> Result<PreparedAction> {
        check_action_type(primary, action)?;

        let stamped = with_chain_fields(action, self.chain);
        let (signed, posted) = user_signed::signing_forms(primary, stamped);
        let document = TypedDataDocument::user_signed(primary, &signed);
        let signing_hash = document.signing_hash()?;

        debug!(
            primary_type = %primary,
            nonce,
            chain = %self.chain,
            "Prepared user-signed action"
        );

        Ok(PreparedAction {
            vault_address: self.posted_vault(&posted),
            action: posted,
            nonce,
            expires_after: self.expires_after,
            document,
            signing_hash,
            connection_id: None,
        })
    }

    /// Vault address to post alongside `action`.
    pub(crate) fn posted_vault(&self, action: &Action) -> Option<Address> {
        match action.action_type() {
            Some(t) if VAULT_EXEMPT_ACTIONS.contains(&t) => None,
            _ => self.vault_address,
        }
    }
}

/// Rejects a user-signed action tagged with a different type.
pub(crate) fn check_action_type(primary: PrimaryType, action: &Action) -> Result<()> {
    match action.action_type() {
        Some(t) if t != primary.action_type() => Err(Error::UnsupportedValue(format!(
            "action type {} cannot be signed as {}",
            t, primary
        ))),
        _ => Ok(()),
    }
}

/// An action ready to be signed by either backend.
#[derive(Debug, Clone)]
pub struct PreparedAction {
    /// The action as it will be posted.
    pub action: Action,
    pub nonce: u64,
    pub vault_address: Option<Address>,
    pub expires_after: Option<u64>,
    /// The document a wallet signs.
    pub document: TypedDataDocument,
    /// Digest of `document`.
    pub signing_hash: B256,
    /// The action hash, for L1 actions.
    pub connection_id: Option<B256>,
}

impl PreparedAction {
    pub fn sign(self, signer: &dyn RawHashSigner) -> Result<SignedAction> {
        let signature = signer.sign_hash(self.signing_hash.as_slice())?;
        debug!(
            signer = %signer.address(),
            nonce = self.nonce,
            "Signed action with raw hash signer"
        );
        Ok(self.into_signed(signature))
    }

    /// Asks a wallet to sign the document and checks the returned signature
    /// recovers to the wallet's address.
    pub async fn sign_with_wallet(self, wallet: &dyn TypedDataSigner) -> Result<SignedAction> {
        let answer = wallet.sign_typed_data(&self.document).await?;
        let signature = Signature::from_hex(&canonical_hex(&answer))?;

        let recovered = signature.recover_address(&self.signing_hash)?;
        let expected = wallet.address();
        if recovered != expected {
            warn!(
                expected = %expected,
                recovered = %recovered,
                "Wallet signature does not match its address"
            );
            return Err(Error::signing(format!(
                "signature recovers to {} instead of {}",
                recovered, expected
            )));
        }

        debug!(signer = %expected, nonce = self.nonce, "Signed action with wallet");
        Ok(self.into_signed(signature))
    }

    fn into_signed(self, signature: Signature) -> SignedAction {
        SignedAction {
            action: self.action,
            nonce: self.nonce,
            signature,
            vault_address: self.vault_address,
            expires_after: self.expires_after,
        }
    }
}

/// A signed action, convertible into the exchange request body.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedAction {
    pub action: Action,
    pub nonce: u64,
    pub signature: Signature,
    pub vault_address: Option<Address>,
    pub expires_after: Option<u64>,
}

/// Wallets may answer without the prefix or in uppercase.
fn canonical_hex(answer: &str) -> String {
    let lower = answer.trim().to_ascii_lowercase();
    match lower.strip_prefix("0x") {
        Some(_) => lower,
        None => format!("0x{}", lower),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signing::signer::{LocalSigner, LocalWallet, MockTypedDataSigner};
    use crate::types::parse_address;

    const TEST_PRIVATE_KEY: &str =
        "0x0123456789012345678901234567890123456789012345678901234567890123";

    fn dummy() -> Action {
        Action::typed("dummy").with("num", 100_000_000_000i128)
    }

    fn usd_send() -> Action {
        Action::typed("usdSend")
            .with("destination", "0x5e9ee1089755c3435139848e47e6635505d5a13a")
            .with("amount", "1")
            .with("time", 1687816341423u64)
    }

    fn vault() -> Address {
        parse_address("0x1719884eb866cb12b2287399b15f7db5e7d775ea").unwrap()
    }

    #[test]
    fn test_l1_regression_vector() {
        let signer = LocalSigner::from_hex(TEST_PRIVATE_KEY).unwrap();

        let signed = SigningContext::new(Chain::Mainnet)
            .sign(&signer, &dummy(), 0, ActionCategory::L1)
            .unwrap();
        assert_eq!(
            signed.signature.to_hex(),
            "0x053749d5b30552aeb2fca34b530185976545bb22d0b3ce6f62e31be961a59298755c40ba9bf05223521753995abb2f73ab3229be8ec921f350cb447e384d8ed81b"
        );

        let signed = SigningContext::new(Chain::Testnet)
            .sign(&signer, &dummy(), 0, ActionCategory::L1)
            .unwrap();
        assert_eq!(
            format!("0x{}", hex::encode(signed.signature.r())),
            "0x542af61ef1f429707e3c76c5293c80d01f74ef853e34b76efffcb57e574f9510"
        );
        assert_eq!(
            format!("0x{}", hex::encode(signed.signature.s())),
            "0x17b8b32f086e8cdede991f1e2c529f5dd5297cbe8128500e00cbaf766204a613"
        );
        assert_eq!(signed.signature.v(), 28);
    }

    #[test]
    fn test_prepare_l1_exposes_connection_id() {
        let prepared = SigningContext::new(Chain::Mainnet)
            .prepare(&dummy(), 0, ActionCategory::L1)
            .unwrap();
        assert_eq!(
            hex::encode(prepared.connection_id.unwrap()),
            "f528daee6a0bd11407b483cfcd9a48c56884180b70ee86f124053e5fc1bf4d57"
        );
        assert_eq!(
            hex::encode(prepared.signing_hash),
            "e0aabfac88a47d3e7028b6ba6a94b30c8afcfffac26cbce788cf362b1312eafa"
        );
        assert_eq!(prepared.action, dummy());
    }

    #[test]
    fn test_user_signed_vector() {
        let signer = LocalSigner::from_hex(TEST_PRIVATE_KEY).unwrap();
        let signed = SigningContext::new(Chain::Testnet)
            .sign(&signer, &usd_send(), 1687816341423, ActionCategory::of(&usd_send()))
            .unwrap();

        assert_eq!(
            format!("0x{}", hex::encode(signed.signature.r())),
            "0x637b37dd731507cdd24f46532ca8ba6eec616952c56218baeff04144e4a77073"
        );
        assert_eq!(
            format!("0x{}", hex::encode(signed.signature.s())),
            "0x11a6a24900e6e314136d2592e2f8d502cd89b7c15b198e1bee043c9589f9fad7"
        );
        assert_eq!(signed.signature.v(), 27);

        assert_eq!(signed.action.get("hyperliquidChain").unwrap().as_str(), Some("Testnet"));
        assert_eq!(signed.action.keys().last(), Some("signatureChainId"));
        assert!(signed.expires_after.is_none());
    }

    #[test]
    fn test_category_inference() {
        assert_eq!(ActionCategory::of(&dummy()), ActionCategory::L1);
        assert_eq!(
            ActionCategory::of(&usd_send()),
            ActionCategory::UserSigned(PrimaryType::UsdSend)
        );
        assert_eq!(
            ActionCategory::of(&Action::typed("withdraw3")),
            ActionCategory::UserSigned(PrimaryType::Withdraw)
        );
    }

    #[test]
    fn test_mismatched_primary_type() {
        let err = SigningContext::default()
            .prepare(&usd_send(), 1, ActionCategory::UserSigned(PrimaryType::SpotSend))
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedValue(_)));
    }

    #[test]
    fn test_vault_posting_rules() {
        let ctx = SigningContext::new(Chain::Mainnet).with_vault_address(vault());

        let l1 = ctx.prepare(&dummy(), 1, ActionCategory::L1).unwrap();
        assert_eq!(l1.vault_address, Some(vault()));

        let transfer = Action::typed("usdClassTransfer")
            .with("amount", "1")
            .with("toPerp", true)
            .with("nonce", 1u64);
        let prepared = ctx.prepare_action(&transfer, 1).unwrap();
        assert_eq!(prepared.vault_address, None);
    }

    #[test]
    fn test_vault_and_expiry_change_l1_hash() {
        let plain = SigningContext::new(Chain::Mainnet);
        let with_vault = plain.with_vault_address(vault());
        let with_expiry = plain.with_expires_after(1_700_000_000_000);

        let a = plain.prepare_action(&dummy(), 0).unwrap().signing_hash;
        let b = with_vault.prepare_action(&dummy(), 0).unwrap().signing_hash;
        let c = with_expiry.prepare_action(&dummy(), 0).unwrap().signing_hash;
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
    }

    #[tokio::test]
    async fn test_backends_agree() {
        let signer = LocalSigner::from_hex(TEST_PRIVATE_KEY).unwrap();
        let wallet = LocalWallet::new(signer.clone());

        for chain in [Chain::Mainnet, Chain::Testnet] {
            let ctx = SigningContext::new(chain).with_expires_after(1_700_000_000_000);
            for action in [dummy(), usd_send()] {
                let category = ActionCategory::of(&action);
                let raw = ctx.sign(&signer, &action, 99, category).unwrap();
                let typed = ctx
                    .sign_with_wallet(&wallet, &action, 99, category)
                    .await
                    .unwrap();
                assert_eq!(raw, typed);
            }
        }
    }

    #[tokio::test]
    async fn test_wallet_receives_rendered_document() {
        let signer = LocalSigner::from_hex(TEST_PRIVATE_KEY).unwrap();
        let address = signer.address();
        let ctx = SigningContext::new(Chain::Mainnet);
        let prepared = ctx.prepare(&dummy(), 0, ActionCategory::L1).unwrap();
        let expected = signer.sign_hash(prepared.signing_hash.as_slice()).unwrap();

        let mut wallet = MockTypedDataSigner::new();
        wallet.expect_address().return_const(address);
        wallet
            .expect_sign_typed_data()
            .withf(|document| document.primary_type == "Agent")
            .times(1)
            .returning(move |_| Ok(expected.to_hex()));

        let signed = prepared.sign_with_wallet(&wallet).await.unwrap();
        assert_eq!(signed.signature, expected);
    }

    #[tokio::test]
    async fn test_wallet_signature_from_wrong_key() {
        let other = LocalSigner::from_hex(
            "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
        )
        .unwrap();
        let signer = LocalSigner::from_hex(TEST_PRIVATE_KEY).unwrap();

        let prepared = SigningContext::default()
            .prepare(&dummy(), 0, ActionCategory::L1)
            .unwrap();
        let wrong = other.sign_hash(prepared.signing_hash.as_slice()).unwrap();

        let mut wallet = MockTypedDataSigner::new();
        wallet.expect_address().return_const(signer.address());
        wallet
            .expect_sign_typed_data()
            .returning(move |_| Ok(wrong.to_hex()));

        let err = prepared.sign_with_wallet(&wallet).await.unwrap_err();
        assert!(matches!(err, Error::SigningFailure { .. }));
    }

    #[tokio::test]
    async fn test_wallet_malformed_signature() {
        let mut wallet = MockTypedDataSigner::new();
        wallet.expect_address().return_const(Address::ZERO);
        wallet
            .expect_sign_typed_data()
            .returning(|_| Ok("0xdeadbeef".to_string()));

        let err = SigningContext::default()
            .sign_with_wallet(&wallet, &dummy(), 0, ActionCategory::L1)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSignatureEncoding(_)));
    }

    #[tokio::test]
    async fn test_wallet_answer_is_normalized() {
        let signer = LocalSigner::from_hex(TEST_PRIVATE_KEY).unwrap();
        let prepared = SigningContext::default()
            .prepare(&dummy(), 0, ActionCategory::L1)
            .unwrap();
        let expected = signer.sign_hash(prepared.signing_hash.as_slice()).unwrap();
        let hex = expected.to_hex();

        for answer in [hex[2..].to_string(), format!("0x{}", hex[2..].to_ascii_uppercase())] {
            let mut wallet = MockTypedDataSigner::new();
            wallet.expect_address().return_const(signer.address());
            wallet
                .expect_sign_typed_data()
                .returning(move |_| Ok(answer.clone()));

            let signed = prepared.clone().sign_with_wallet(&wallet).await.unwrap();
            assert_eq!(signed.signature, expected);
        }
    }

    #[test]
    fn test_signing_types_are_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SigningContext>();
        assert_send_sync::<PreparedAction>();
        assert_send_sync::<LocalSigner>();
        assert_send_sync::<LocalWallet>();
    }

    #[test]
    fn test_concurrent_signing_is_deterministic() {
        let signer = LocalSigner::from_hex(TEST_PRIVATE_KEY).unwrap();
        let ctx = SigningContext::new(Chain::Testnet).with_vault_address(vault());
        let prepared = ctx.prepare(&dummy(), 7, ActionCategory::L1).unwrap();
        let expected = prepared.clone().sign(&signer).unwrap().signature;

        let signatures: Vec<Signature> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let (ctx, signer, prepared) = (&ctx, &signer, &prepared);
                    scope.spawn(move || {
                        if i % 2 == 0 {
                            prepared.clone().sign(signer).unwrap().signature
                        } else {
                            ctx.sign(signer, &dummy(), 7, ActionCategory::L1)
                                .unwrap()
                                .signature
                        }
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(signatures.len(), 8);
        assert!(signatures.iter().all(|s| *s == expected));
    }
}
