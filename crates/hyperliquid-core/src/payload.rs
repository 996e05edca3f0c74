//! Request body for the exchange endpoint.

use serde::Serialize;

use crate::signing::SignedAction;
use crate::types::{address_to_wire, Action, Signature};
use crate::Result;

/// `POST /exchange` body. `vaultAddress` and `expiresAfter` are always
/// present and `null` when unset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangePayload {
    pub action: Action,
    pub nonce: u64,
    pub signature: Signature,
    pub vault_address: Option<String>,
    pub expires_after: Option<u64>,
}

impl ExchangePayload {
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl From<SignedAction> for ExchangePayload {
    fn from(signed: SignedAction) -> Self {
        Self {
            action: signed.action,
            nonce: signed.nonce,
            signature: signed.signature,
            vault_address: signed.vault_address.as_ref().map(address_to_wire),
            expires_after: signed.expires_after,
        }
    }
}

impl SignedAction {
    pub fn into_payload(self) -> ExchangePayload {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Address;
    use crate::signing::{ActionCategory, LocalSigner, SigningContext};
    use crate::types::{parse_address, Chain};

    const TEST_PRIVATE_KEY: &str =
        "0x0123456789012345678901234567890123456789012345678901234567890123";

    fn vault() -> Address {
        parse_address("0x1719884eb866cb12b2287399b15f7db5e7d775ea").unwrap()
    }

    #[test]
    fn test_l1_payload_shape() {
        let signer = LocalSigner::from_hex(TEST_PRIVATE_KEY).unwrap();
        let action = Action::typed("dummy").with("num", 100_000_000_000u64);
        let payload: ExchangePayload = SigningContext::new(Chain::Mainnet)
            .with_vault_address(vault())
            .sign(&signer, &action, 3, ActionCategory::L1)
            .unwrap()
            .into();

        let json = payload.to_json().unwrap();
        assert_eq!(json["action"]["type"], "dummy");
        assert_eq!(json["nonce"], 3);
        assert_eq!(json["vaultAddress"], "0x1719884eb866cb12b2287399b15f7db5e7d775ea");
        assert!(json["expiresAfter"].is_null());
        assert!(json["signature"]["r"].as_str().unwrap().starts_with("0x"));
        assert!(json["signature"]["v"].as_u64().unwrap() >= 27);

        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(
            keys,
            vec!["action", "nonce", "signature", "vaultAddress", "expiresAfter"]
        );
    }

    #[test]
    fn test_vault_exempt_payload() {
        let signer = LocalSigner::from_hex(TEST_PRIVATE_KEY).unwrap();
        let action = Action::typed("usdClassTransfer")
            .with("amount", "1 subaccount:0x1719884eb866cb12b2287399b15f7db5e7d775ea")
            .with("toPerp", true)
            .with("nonce", 11u64);
        let payload = SigningContext::new(Chain::Mainnet)
            .with_vault_address(vault())
            .with_expires_after(1_700_000_000_000)
            .sign(&signer, &action, 11, ActionCategory::of(&action))
            .unwrap()
            .into_payload();

        let json = payload.to_json().unwrap();
        assert!(json["vaultAddress"].is_null());
        assert_eq!(json["expiresAfter"], 1_700_000_000_000u64);
        assert_eq!(json["action"]["hyperliquidChain"], "Mainnet");
        assert_eq!(json["action"]["signatureChainId"], "0x66eee");
    }

    #[test]
    fn test_action_keeps_posted_order() {
        let signer = LocalSigner::from_hex(TEST_PRIVATE_KEY).unwrap();
        let action = Action::typed("order")
            .with("orders", Vec::<Action>::new())
            .with("grouping", "na");
        let payload = SigningContext::default()
            .sign(&signer, &action, 1, ActionCategory::L1)
            .unwrap()
            .into_payload();

        let body = payload.to_json_string().unwrap();
        assert!(body.starts_with(r#"{"action":{"type":"order","orders":[],"grouping":"na"},"nonce":1,"#));
    }
}
