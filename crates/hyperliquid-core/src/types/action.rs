//! Ordered action trees.
//!
//! An [`Action`] is an association list whose iteration order is always its
//! insertion order. That order is part of the signed content: the encoder
//! emits entries exactly as stored, so two actions with the same keys in a
//! different order hash differently. The only place keys are ever sorted is
//! [`Action::from_unordered`] (and [`Action::from_json`], which goes through
//! it), where the source has no order to preserve.

use alloy_primitives::{Address, B256};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::{Error, Result};

/// A single value inside an action tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionValue {
    /// Explicit nil marker. Only used where a schema requires it.
    Nil,
    Text(String),
    Int(i64),
    UInt(u64),
    /// Wide integer; must fit the 64-bit family when encoded.
    BigInt(i128),
    Bool(bool),
    Map(Action),
    List(Vec<ActionValue>),
    Bytes(Vec<u8>),
}

impl ActionValue {
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        ActionValue::Bytes(bytes.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ActionValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Action> {
        match self {
            ActionValue::Map(a) => Some(a),
            _ => None,
        }
    }

    /// Converts a JSON value. Objects become actions with sorted keys and
    /// non-integral numbers are rejected.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        use serde_json::Value;

        Ok(match value {
            Value::Null => ActionValue::Nil,
            Value::Bool(b) => ActionValue::Bool(*b),
            Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    ActionValue::UInt(u)
                } else if let Some(i) = n.as_i64() {
                    ActionValue::Int(i)
                } else {
                    return Err(Error::UnsupportedValue(format!(
                        "non-integral number {} (convert decimals with the wire helpers first)",
                        n
                    )));
                }
            }
            Value::String(s) => ActionValue::Text(s.clone()),
            Value::Array(items) => ActionValue::List(
                items
                    .iter()
                    .map(ActionValue::from_json)
                    .collect::<Result<Vec<_>>>()?,
            ),
            Value::Object(_) => ActionValue::Map(Action::from_json(value)?),
        })
    }

    /// JSON view of the value, used for typed-data messages.
    ///
    /// Bytes render as `0x` hex and integers wider than 64 bits as decimal
    /// strings.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;

        match self {
            ActionValue::Nil => Value::Null,
            ActionValue::Text(s) => Value::String(s.clone()),
            ActionValue::Int(i) => Value::from(*i),
            ActionValue::UInt(u) => Value::from(*u),
            ActionValue::BigInt(i) => {
                if let Ok(u) = u64::try_from(*i) {
                    Value::from(u)
                } else if let Ok(s) = i64::try_from(*i) {
                    Value::from(s)
                } else {
                    Value::String(i.to_string())
                }
            }
            ActionValue::Bool(b) => Value::Bool(*b),
            ActionValue::Map(action) => action.to_json(),
            ActionValue::List(items) => Value::Array(items.iter().map(|v| v.to_json()).collect()),
            ActionValue::Bytes(b) => Value::String(format!("0x{}", hex::encode(b))),
        }
    }
}

impl Serialize for ActionValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ActionValue::Nil => serializer.serialize_unit(),
            ActionValue::Text(s) => serializer.serialize_str(s),
            ActionValue::Int(i) => serializer.serialize_i64(*i),
            ActionValue::UInt(u) => serializer.serialize_u64(*u),
            ActionValue::BigInt(i) => {
                if let Ok(u) = u64::try_from(*i) {
                    serializer.serialize_u64(u)
                } else if let Ok(s) = i64::try_from(*i) {
                    serializer.serialize_i64(s)
                } else {
                    serializer.serialize_str(&i.to_string())
                }
            }
            ActionValue::Bool(b) => serializer.serialize_bool(*b),
            ActionValue::Map(action) => action.serialize(serializer),
            ActionValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            ActionValue::Bytes(b) => serializer.serialize_str(&format!("0x{}", hex::encode(b))),
        }
    }
}

impl From<String> for ActionValue {
    fn from(s: String) -> Self {
        ActionValue::Text(s)
    }
}

impl From<&str> for ActionValue {
    fn from(s: &str) -> Self {
        ActionValue::Text(s.to_string())
    }
}

impl From<bool> for ActionValue {
    fn from(b: bool) -> Self {
        ActionValue::Bool(b)
    }
}

impl From<i64> for ActionValue {
    fn from(i: i64) -> Self {
        ActionValue::Int(i)
    }
}

impl From<i32> for ActionValue {
    fn from(i: i32) -> Self {
        ActionValue::Int(i as i64)
    }
}

impl From<u64> for ActionValue {
    fn from(u: u64) -> Self {
        ActionValue::UInt(u)
    }
}

impl From<u32> for ActionValue {
    fn from(u: u32) -> Self {
        ActionValue::UInt(u as u64)
    }
}

impl From<u16> for ActionValue {
    fn from(u: u16) -> Self {
        ActionValue::UInt(u as u64)
    }
}

impl From<u8> for ActionValue {
    fn from(u: u8) -> Self {
        ActionValue::UInt(u as u64)
    }
}

impl From<i128> for ActionValue {
    fn from(i: i128) -> Self {
        ActionValue::BigInt(i)
    }
}

/// Addresses travel as lowercase `0x` hex text.
impl From<Address> for ActionValue {
    fn from(address: Address) -> Self {
        ActionValue::Text(address_to_wire(&address))
    }
}

impl From<B256> for ActionValue {
    fn from(hash: B256) -> Self {
        ActionValue::Text(format!("0x{}", hex::encode(hash.as_slice())))
    }
}

impl From<Action> for ActionValue {
    fn from(action: Action) -> Self {
        ActionValue::Map(action)
    }
}

impl<T: Into<ActionValue>> From<Vec<T>> for ActionValue {
    fn from(items: Vec<T>) -> Self {
        ActionValue::List(items.into_iter().map(Into::into).collect())
    }
}

/// Lowercase `0x`-prefixed hex form of an address.
pub fn address_to_wire(address: &Address) -> String {
    format!("0x{}", hex::encode(address.as_slice()))
}

/// Parses a `0x`-prefixed (or bare) 20-byte hex address.
pub fn parse_address(s: &str) -> Result<Address> {
    let trimmed = s.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.len() != 40 {
        return Err(Error::InvalidAddress(format!(
            "{} (expected 40 hex digits, got {})",
            s,
            digits.len()
        )));
    }
    let bytes = hex::decode(digits).map_err(|e| Error::InvalidAddress(format!("{}: {}", s, e)))?;
    Ok(Address::from_slice(&bytes))
}

/// An ordered action tree. Iteration order == insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Action {
    entries: Vec<(String, ActionValue)>,
}

impl Action {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts an action whose first entry is `type`.
    pub fn typed(action_type: &str) -> Self {
        Self::new().with("type", action_type)
    }

    /// Builds an action from a source without meaningful order.
    ///
    /// Keys are sorted lexicographically so the result is deterministic.
    pub fn from_unordered<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<ActionValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut entries: Vec<(String, ActionValue)> = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let mut action = Self::new();
        for (key, value) in entries {
            action.insert(key, value);
        }
        action
    }

    /// Builds an action from a JSON object, sorting keys at every level.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            Error::UnsupportedValue(format!("expected a JSON object, got {}", value))
        })?;

        let mut entries = Vec::with_capacity(object.len());
        for (key, value) in object {
            entries.push((key.clone(), ActionValue::from_json(value)?));
        }
        Ok(Self::from_unordered(entries))
    }

    /// Inserts a value. An existing key keeps its position and gets the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ActionValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<ActionValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Appends the entry only when a value is present.
    pub fn with_opt<V: Into<ActionValue>>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.with(key, v),
            None => self,
        }
    }

    pub fn get(&self, key: &str) -> Option<&ActionValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<ActionValue> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    /// The `type` tag, if present.
    pub fn action_type(&self) -> Option<&str> {
        self.get("type").and_then(ActionValue::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ActionValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(self.to_json_map())
    }

    pub fn to_json_map(&self) -> serde_json::Map<String, serde_json::Value> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<ActionValue>> FromIterator<(K, V)> for Action {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut action = Action::new();
        for (k, v) in iter {
            action.insert(k, v);
        }
        action
    }
}

impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
