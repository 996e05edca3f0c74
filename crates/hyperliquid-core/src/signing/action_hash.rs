//! Action hashing (the L1 "connection id").

use alloy_primitives::{keccak256, Address, B256};

use crate::types::{Action, ActionValue};
use crate::wire;
use crate::Result;

/// keccak256(encoded ‖ be64(nonce) ‖ vault marker ‖ [0x00 ‖ be64(expiry)]).
///
/// The vault marker is `0x01 ‖ address` when a vault is set, `0x00` otherwise.
pub fn hash_encoded(
    encoded: &[u8],
    nonce: u64,
    vault_address: Option<&Address>,
    expires_after: Option<u64>,
) -> B256 {
    let mut data = Vec::with_capacity(encoded.len() + 8 + 21 + 9);
    data.extend_from_slice(encoded);
    data.extend_from_slice(&nonce.to_be_bytes());

    match vault_address {
        Some(vault) => {
            data.push(0x01);
            data.extend_from_slice(vault.as_slice());
        }
        None => data.push(0x00),
    }

    if let Some(expires_after) = expires_after {
        data.push(0x00);
        data.extend_from_slice(&expires_after.to_be_bytes());
    }

    keccak256(&data)
}

/// Hash of an action map.
pub fn action_hash(
    action: &Action,
    nonce: u64,
    vault_address: Option<&Address>,
    expires_after: Option<u64>,
) -> Result<B256> {
    let encoded = wire::encode(action)?;
    Ok(hash_encoded(&encoded, nonce, vault_address, expires_after))
}

/// Hash of an arbitrary action value, e.g. a multi-sig inner payload list.
pub fn value_hash(
    value: &ActionValue,
    nonce: u64,
    vault_address: Option<&Address>,
    expires_after: Option<u64>,
) -> Result<B256> {
    let encoded = wire::encode_value(value)?;
    Ok(hash_encoded(&encoded, nonce, vault_address, expires_after))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::parse_address;
    use crate::Error;

    fn dummy() -> Action {
        Action::typed("dummy").with("num", 100_000_000_000i128)
    }

    fn vault() -> Address {
        parse_address("0x1719884eb866cb12b2287399b15f7db5e7d775ea").unwrap()
    }

    #[test]
    fn test_action_hash_vectors() {
        assert_eq!(
            hex::encode(action_hash(&dummy(), 0, None, None).unwrap()),
            "f528daee6a0bd11407b483cfcd9a48c56884180b70ee86f124053e5fc1bf4d57"
        );
        assert_eq!(
            hex::encode(action_hash(&dummy(), 0, Some(&vault()), None).unwrap()),
            "de9e09a7a3da45cc694096d4bfdcd89bc1b892d05497c5ecc1f56c335945184c"
        );
        assert_eq!(
            hex::encode(action_hash(&dummy(), 0, None, Some(1_700_000_000_000)).unwrap()),
            "9114ee526744bdf8803e63aecc504b312aad1c0e5d9f081000d61c710a711a27"
        );
        assert_eq!(
            hex::encode(
                action_hash(&dummy(), 1_583_838, Some(&vault()), Some(1_700_000_000_000)).unwrap()
            ),
            "adeb5fd5659f5ff98b1fcafcd14a8d73176d40b937a5c5a663fbc9e14feb6c60"
        );
    }

    #[test]
    fn test_hash_is_deterministic() {
        let a = action_hash(&dummy(), 42, Some(&vault()), None).unwrap();
        let b = action_hash(&dummy(), 42, Some(&vault()), None).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, action_hash(&dummy(), 43, Some(&vault()), None).unwrap());
    }

    #[test]
    fn test_map_and_value_paths_agree() {
        let action = dummy();
        assert_eq!(
            action_hash(&action, 7, None, None).unwrap(),
            value_hash(&ActionValue::Map(action), 7, None, None).unwrap()
        );
    }

    #[test]
    fn test_unencodable_action() {
        let action = Action::typed("dummy").with("num", i128::MAX);
        assert!(matches!(
            action_hash(&action, 0, None, None),
            Err(Error::UnsupportedValue(_))
        ));
    }
}
