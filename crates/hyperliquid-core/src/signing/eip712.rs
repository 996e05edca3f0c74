//! Generic EIP-712 struct hashing.
//!
//! Both signing backends go through [`struct_hash`] and [`final_hash`]: the
//! raw-hash path hashes exactly the document a wallet would be asked to sign.

use alloy_primitives::{keccak256, Address, FixedBytes, B256, U256};
use alloy_sol_types::SolValue;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::parse_address;
use crate::{Error, Result};

/// The closed set of field types used by exchange schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Eip712Type {
    String,
    Address,
    Bool,
    Uint64,
    Uint256,
    Bytes32,
}

impl Eip712Type {
    pub fn as_str(&self) -> &'static str {
        match self {
            Eip712Type::String => "string",
            Eip712Type::Address => "address",
            Eip712Type::Bool => "bool",
            Eip712Type::Uint64 => "uint64",
            Eip712Type::Uint256 => "uint256",
            Eip712Type::Bytes32 => "bytes32",
        }
    }
}

impl std::fmt::Display for Eip712Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `{name, type}` entry of a struct schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedField {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Eip712Type,
}

impl TypedField {
    pub fn new(name: impl Into<String>, ty: Eip712Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Builds a schema from `(name, type)` pairs.
pub fn fields(pairs: &[(&str, Eip712Type)]) -> Vec<TypedField> {
    pairs
        .iter()
        .map(|(name, ty)| TypedField::new(*name, *ty))
        .collect()
}

/// `Name(type1 name1,type2 name2,...)`
pub fn type_string(primary_type: &str, fields: &[TypedField]) -> String {
    let members: Vec<String> = fields
        .iter()
        .map(|f| format!("{} {}", f.ty, f.name))
        .collect();
    format!("{}({})", primary_type, members.join(","))
}

pub fn type_hash(primary_type: &str, fields: &[TypedField]) -> B256 {
    keccak256(type_string(primary_type, fields).as_bytes())
}

pub fn encode_string(value: &str) -> B256 {
    keccak256(value.as_bytes())
}

pub fn encode_address(address: &Address) -> B256 {
    B256::left_padding_from(address.as_slice())
}

pub fn encode_bool(value: bool) -> B256 {
    encode_uint(value as u64)
}

pub fn encode_uint(value: u64) -> B256 {
    word(U256::from(value))
}

fn word(value: U256) -> B256 {
    B256::from(value.to_be_bytes::<32>())
}

/// Encodes one JSON message value as a 32-byte word.
///
/// A missing or `null` value encodes as the zero word. A value whose JSON
/// shape does not match `ty` is rejected.
pub fn encode_field(value: Option<&Value>, ty: Eip712Type) -> Result<B256> {
    let value = match value {
        None | Some(Value::Null) => return Ok(B256::ZERO),
        Some(v) => v,
    };

    match (ty, value) {
        (Eip712Type::String, Value::String(s)) => Ok(encode_string(s)),
        (Eip712Type::Address, Value::String(s)) => Ok(encode_address(&parse_address(s)?)),
        (Eip712Type::Bool, Value::Bool(b)) => Ok(encode_bool(*b)),
        (Eip712Type::Uint64, Value::Number(n)) => n
            .as_u64()
            .map(encode_uint)
            .ok_or_else(|| Error::UnsupportedValue(format!("{} is not a uint64", n))),
        (Eip712Type::Uint256, Value::Number(n)) => n
            .as_u64()
            .map(encode_uint)
            .ok_or_else(|| Error::UnsupportedValue(format!("{} is not a uint256", n))),
        (Eip712Type::Uint256, Value::String(s)) => parse_uint256(s).map(word),
        (Eip712Type::Bytes32, Value::String(s)) => {
            let digits = s.strip_prefix("0x").unwrap_or(s);
            let bytes = hex::decode(digits)
                .map_err(|e| Error::UnsupportedValue(format!("bytes32 {}: {}", s, e)))?;
            if bytes.len() > 32 {
                return Err(Error::UnsupportedValue(format!(
                    "bytes32 value is {} bytes long",
                    bytes.len()
                )));
            }
            Ok(B256::left_padding_from(&bytes))
        }
        (ty, other) => Err(Error::UnsupportedValue(format!(
            "cannot encode {} as {}",
            other, ty
        ))),
    }
}

/// `0x` hex or decimal string to a 256-bit integer.
/// Only `0x`-prefixed hex; decimal strings are a type mismatch.
fn parse_uint256(s: &str) -> Result<U256> {
    let digits = s
        .strip_prefix("0x")
        .filter(|d| !d.is_empty())
        .ok_or_else(|| Error::UnsupportedValue(format!("uint256 {} is not 0x-prefixed hex", s)))?;
    U256::from_str_radix(digits, 16)
        .map_err(|e| Error::UnsupportedValue(format!("uint256 {}: {}", s, e)))
}

/// keccak256 of the type hash followed by each field's encoded word.
pub fn struct_hash(
    primary_type: &str,
    fields: &[TypedField],
    message: &Map<String, Value>,
) -> Result<B256> {
    let mut words = Vec::with_capacity(fields.len() + 1);
    words.push(type_hash(primary_type, fields));
    for field in fields {
        words.push(encode_field(message.get(&field.name), field.ty)?);
    }
    Ok(hash_words(words))
}

/// Struct hash over already encoded words.
pub(crate) fn hash_words(words: Vec<B256>) -> B256 {
    let mut encoded = Vec::with_capacity(words.len() * 32);
    for w in &words {
        encoded.extend_from_slice(w.as_slice());
    }
    keccak256(&encoded)
}

/// keccak256(0x19 0x01 ‖ domainSeparator ‖ structHash)
pub fn final_hash(domain_separator: B256, struct_hash: B256) -> B256 {
    let prefix = FixedBytes::<2>::new([0x19, 0x01]);
    let data = (prefix, domain_separator, struct_hash).abi_encode_packed();
    keccak256(&data)
}
