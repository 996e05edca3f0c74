//! EIP-712 domains for Hyperliquid signing.
//!
//! The exchange uses exactly two domains: one for L1 actions (signed through
//! a phantom `Agent` struct) and one for user-signed transactions. Both are
//! built once per process and never mutated.

use std::sync::LazyLock;

use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::eip712::{self, encode_address, encode_string, encode_uint, Eip712Type, TypedField};

/// Chain id of the L1 signing domain.
pub const L1_CHAIN_ID: u64 = 1337;

/// Chain id of the user-signed domain (421614).
pub const USER_SIGNED_CHAIN_ID: u64 = 0x66eee;

/// `signatureChainId` value carried by user-signed actions.
pub const SIGNATURE_CHAIN_ID: &str = "0x66eee";

pub static L1_DOMAIN: LazyLock<Eip712Domain> =
    LazyLock::new(|| Eip712Domain::new("Exchange", "1", L1_CHAIN_ID, Address::ZERO));

pub static USER_SIGNED_DOMAIN: LazyLock<Eip712Domain> = LazyLock::new(|| {
    Eip712Domain::new(
        "HyperliquidSignTransaction",
        "1",
        USER_SIGNED_CHAIN_ID,
        Address::ZERO,
    )
});

/// EIP-712 domain separator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eip712Domain {
    pub name: String,
    pub version: String,
    pub chain_id: u64,
    #[serde(with = "address_hex")]
    pub verifying_contract: Address,
}

impl Eip712Domain {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        chain_id: u64,
        verifying_contract: Address,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            chain_id,
            verifying_contract,
        }
    }

    /// Domain for L1 actions.
    pub fn l1() -> &'static Self {
        &*L1_DOMAIN
    }

    /// Domain for user-signed actions.
    pub fn user_signed() -> &'static Self {
        &*USER_SIGNED_DOMAIN
    }

    /// The `EIP712Domain` schema, in hashing order.
    pub fn fields() -> Vec<TypedField> {
        eip712::fields(&[
            ("name", Eip712Type::String),
            ("version", Eip712Type::String),
            ("chainId", Eip712Type::Uint256),
            ("verifyingContract", Eip712Type::Address),
        ])
    }

    /// Compute the EIP-712 domain separator hash.
    pub fn separator(&self) -> B256 {
        eip712::hash_words(vec![
            eip712::type_hash("EIP712Domain", &Self::fields()),
            encode_string(&self.name),
            encode_string(&self.version),
            encode_uint(self.chain_id),
            encode_address(&self.verifying_contract),
        ])
    }

    /// JSON form as embedded in a typed-data document.
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "name": self.name,
            "version": self.version,
            "chainId": self.chain_id,
            "verifyingContract": crate::types::address_to_wire(&self.verifying_contract),
        })
    }
}

/// Serde helpers for lowercase `0x` address strings.
pub(crate) mod address_hex {
    use alloy_primitives::Address;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::types::{address_to_wire, parse_address};

    pub fn serialize<S: Serializer>(address: &Address, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&address_to_wire(address))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Address, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_address(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_l1_domain() {
        let domain = Eip712Domain::l1();
        assert_eq!(domain.name, "Exchange");
        assert_eq!(domain.version, "1");
        assert_eq!(domain.chain_id, 1337);
        assert_eq!(domain.verifying_contract, Address::ZERO);
        assert_eq!(
            hex::encode(domain.separator()),
            "d79297fcdf2ffcd4ae223d01edaa2ba214ff8f401d7c9300d995d17c82aa4040"
        );
    }

    #[test]
    fn test_user_signed_domain() {
        let domain = Eip712Domain::user_signed();
        assert_eq!(domain.name, "HyperliquidSignTransaction");
        assert_eq!(domain.chain_id, 421614);
        assert_eq!(format!("{:#x}", domain.chain_id), SIGNATURE_CHAIN_ID);
        assert_eq!(
            hex::encode(domain.separator()),
            "feb1393ca4412a4ca577bd51d04f0a77033514c602f4d0a11490fb95f7428df6"
        );
    }

    #[test]
    fn test_separator_matches_generic_struct_hash() {
        let domain = Eip712Domain::l1();
        let message = domain.to_json();
        let generic =
            eip712::struct_hash("EIP712Domain", &Eip712Domain::fields(), message.as_object().unwrap())
                .unwrap();
        assert_eq!(domain.separator(), generic);
    }

    #[test]
    fn test_domain_json() {
        let json = serde_json::to_value(Eip712Domain::l1()).unwrap();
        assert_eq!(
            json,
            json!({
                "name": "Exchange",
                "version": "1",
                "chainId": 1337,
                "verifyingContract": "0x0000000000000000000000000000000000000000"
            })
        );
        assert_eq!(json, Eip712Domain::l1().to_json());

        let back: Eip712Domain = serde_json::from_value(json).unwrap();
        assert_eq!(&back, Eip712Domain::l1());
    }

    #[test]
    fn test_domains_are_shared() {
        assert!(std::ptr::eq(Eip712Domain::l1(), Eip712Domain::l1()));
    }
}
