//! Typed-data documents and the user-signed transaction schemas.

use std::collections::BTreeMap;

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::domain::{Eip712Domain, SIGNATURE_CHAIN_ID};
use super::eip712::{self, Eip712Type, TypedField};
use crate::types::{Action, Chain};
use crate::{Error, Result};

/// Primary type of the phantom struct signed for L1 actions.
pub const AGENT_TYPE: &str = "Agent";

/// User-signed transaction kinds and their schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimaryType {
    UsdSend,
    SpotSend,
    Withdraw,
    UsdClassTransfer,
    SendAsset,
    TokenDelegate,
    ApproveAgent,
    ApproveBuilderFee,
    ConvertToMultiSigUser,
    SendMultiSig,
    UserDexAbstraction,
}

impl PrimaryType {
    pub const ALL: [PrimaryType; 11] = [
        PrimaryType::UsdSend,
        PrimaryType::SpotSend,
        PrimaryType::Withdraw,
        PrimaryType::UsdClassTransfer,
        PrimaryType::SendAsset,
        PrimaryType::TokenDelegate,
        PrimaryType::ApproveAgent,
        PrimaryType::ApproveBuilderFee,
        PrimaryType::ConvertToMultiSigUser,
        PrimaryType::SendMultiSig,
        PrimaryType::UserDexAbstraction,
    ];

    /// Full EIP-712 type name, e.g. `HyperliquidTransaction:UsdSend`.
    pub fn type_name(&self) -> &'static str {
        match self {
            PrimaryType::UsdSend => "HyperliquidTransaction:UsdSend",
            PrimaryType::SpotSend => "HyperliquidTransaction:SpotSend",
            PrimaryType::Withdraw => "HyperliquidTransaction:Withdraw",
            PrimaryType::UsdClassTransfer => "HyperliquidTransaction:UsdClassTransfer",
            PrimaryType::SendAsset => "HyperliquidTransaction:SendAsset",
            PrimaryType::TokenDelegate => "HyperliquidTransaction:TokenDelegate",
            PrimaryType::ApproveAgent => "HyperliquidTransaction:ApproveAgent",
            PrimaryType::ApproveBuilderFee => "HyperliquidTransaction:ApproveBuilderFee",
            PrimaryType::ConvertToMultiSigUser => "HyperliquidTransaction:ConvertToMultiSigUser",
            PrimaryType::SendMultiSig => "HyperliquidTransaction:SendMultiSig",
            PrimaryType::UserDexAbstraction => "HyperliquidTransaction:UserDexAbstraction",
        }
    }

    /// The `type` tag of the posted action.
    pub fn action_type(&self) -> &'static str {
        match self {
            PrimaryType::UsdSend => "usdSend",
            PrimaryType::SpotSend => "spotSend",
            PrimaryType::Withdraw => "withdraw3",
            PrimaryType::UsdClassTransfer => "usdClassTransfer",
            PrimaryType::SendAsset => "sendAsset",
            PrimaryType::TokenDelegate => "tokenDelegate",
            PrimaryType::ApproveAgent => "approveAgent",
            PrimaryType::ApproveBuilderFee => "approveBuilderFee",
            PrimaryType::ConvertToMultiSigUser => "convertToMultiSigUser",
            PrimaryType::SendMultiSig => "multiSig",
            PrimaryType::UserDexAbstraction => "userDexAbstraction",
        }
    }

    pub fn from_action_type(action_type: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.action_type() == action_type)
    }

    /// Schema fields after `hyperliquidChain`.
    fn payload_fields(&self) -> &'static [(&'static str, Eip712Type)] {
        use Eip712Type::*;

        match self {
            PrimaryType::UsdSend | PrimaryType::Withdraw => &[
                ("destination", String),
                ("amount", String),
                ("time", Uint64),
            ],
            PrimaryType::SpotSend => &[
                ("destination", String),
                ("token", String),
                ("amount", String),
                ("time", Uint64),
            ],
            PrimaryType::UsdClassTransfer => &[
                ("amount", String),
                ("toPerp", Bool),
                ("nonce", Uint64),
            ],
            PrimaryType::SendAsset => &[
                ("destination", String),
                ("sourceDex", String),
                ("destinationDex", String),
                ("token", String),
                ("amount", String),
                ("fromSubAccount", String),
                ("nonce", Uint64),
            ],
            PrimaryType::TokenDelegate => &[
                ("validator", Address),
                ("wei", Uint64),
                ("isUndelegate", Bool),
                ("nonce", Uint64),
            ],
            PrimaryType::ApproveAgent => &[
                ("agentAddress", Address),
                ("agentName", String),
                ("nonce", Uint64),
            ],
            PrimaryType::ApproveBuilderFee => &[
                ("maxFeeRate", String),
                ("builder", Address),
                ("nonce", Uint64),
            ],
            PrimaryType::ConvertToMultiSigUser => &[("signers", String), ("nonce", Uint64)],
            PrimaryType::SendMultiSig => &[("multiSigActionHash", Bytes32), ("nonce", Uint64)],
            PrimaryType::UserDexAbstraction => &[
                ("user", Address),
                ("enabled", Bool),
                ("nonce", Uint64),
            ],
        }
    }

    /// Full schema: `hyperliquidChain` first, then the payload fields.
    pub fn fields(&self) -> Vec<TypedField> {
        let mut fields = vec![TypedField::new("hyperliquidChain", Eip712Type::String)];
        fields.extend(eip712::fields(self.payload_fields()));
        fields
    }

    /// Schema used when a multi-sig co-signer signs this action: the
    /// payload user and outer signer follow `hyperliquidChain`.
    pub fn multi_sig_fields(&self) -> Vec<TypedField> {
        let mut fields = vec![
            TypedField::new("hyperliquidChain", Eip712Type::String),
            TypedField::new("payloadMultiSigUser", Eip712Type::Address),
            TypedField::new("outerSigner", Eip712Type::Address),
        ];
        fields.extend(eip712::fields(self.payload_fields()));
        fields
    }
}

impl std::fmt::Display for PrimaryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Adds the chain fields every user-signed action carries.
///
/// Any caller-supplied `hyperliquidChain` or `signatureChainId` is replaced;
/// `signatureChainId` always ends up as the last entry.
pub fn with_chain_fields(action: &Action, chain: Chain) -> Action {
    let mut stamped: Action = action
        .iter()
        .filter(|(k, _)| *k != "hyperliquidChain" && *k != "signatureChainId")
        .map(|(k, v)| (k, v.clone()))
        .collect();
    stamped.insert("hyperliquidChain", chain.hyperliquid_chain());
    stamped.insert("signatureChainId", SIGNATURE_CHAIN_ID);
    stamped
}

/// An EIP-712 typed-data document in the shape wallets accept for
/// `eth_signTypedData_v4`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedDataDocument {
    pub domain: Eip712Domain,
    pub types: BTreeMap<String, Vec<TypedField>>,
    pub primary_type: String,
    pub message: Map<String, Value>,
}

impl TypedDataDocument {
    pub fn new(
        domain: &Eip712Domain,
        primary_type: &str,
        fields: Vec<TypedField>,
        message: Map<String, Value>,
    ) -> Self {
        let mut types = BTreeMap::new();
        types.insert("EIP712Domain".to_string(), Eip712Domain::fields());
        types.insert(primary_type.to_string(), fields);

        Self {
            domain: domain.clone(),
            types,
            primary_type: primary_type.to_string(),
            message,
        }
    }

    /// Phantom agent document for an L1 action hash.
    pub fn l1_agent(connection_id: B256, chain: Chain) -> Self {
        let fields = eip712::fields(&[
            ("source", Eip712Type::String),
            ("connectionId", Eip712Type::Bytes32),
        ]);

        let mut message = Map::new();
        message.insert("source".into(), Value::from(chain.agent_source()));
        message.insert(
            "connectionId".into(),
            Value::from(format!("0x{}", hex::encode(connection_id))),
        );

        Self::new(Eip712Domain::l1(), AGENT_TYPE, fields, message)
    }

    /// Document for a user-signed action already carrying its chain fields.
    pub fn user_signed(primary_type: PrimaryType, action: &Action) -> Self {
        Self::new(
            Eip712Domain::user_signed(),
            primary_type.type_name(),
            primary_type.fields(),
            action.to_json_map(),
        )
    }

    /// Schema of the primary type.
    pub fn primary_fields(&self) -> Result<&[TypedField]> {
        self.types
            .get(&self.primary_type)
            .map(Vec::as_slice)
            .ok_or_else(|| {
                Error::UnsupportedValue(format!(
                    "document has no schema for primary type {}",
                    self.primary_type
                ))
            })
    }

    pub fn struct_hash(&self) -> Result<B256> {
        eip712::struct_hash(&self.primary_type, self.primary_fields()?, &self.message)
    }

    /// The digest a wallet signs for this document.
    pub fn signing_hash(&self) -> Result<B256> {
        Ok(eip712::final_hash(self.domain.separator(), self.struct_hash()?))
    }

    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}
