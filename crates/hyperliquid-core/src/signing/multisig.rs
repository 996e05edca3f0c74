//! Multi-signature flows.
//!
//! Each authorized co-signer signs the inner action bound to the multi-sig
//! user and the outer signer; the outer signer then wraps the collected
//! signatures in a `multiSig` envelope and signs that envelope's hash as a
//! `SendMultiSig` transaction.

use alloy_primitives::Address;
use tracing::debug;

use super::action_hash::{action_hash, value_hash};
use super::context::{check_action_type, ActionCategory, PreparedAction, SigningContext};
use super::domain::{Eip712Domain, SIGNATURE_CHAIN_ID};
use super::typed_data::{with_chain_fields, PrimaryType, TypedDataDocument};
use crate::actions::user_signed;
use crate::types::{Action, ActionValue, Signature};
use crate::{Error, Result};

/// The value a co-signer hashes for an L1 inner action.
pub fn inner_l1_payload(multi_sig_user: &Address, outer_signer: &Address, action: &Action) -> ActionValue {
    ActionValue::List(vec![
        ActionValue::from(*multi_sig_user),
        ActionValue::from(*outer_signer),
        ActionValue::Map(action.clone()),
    ])
}

/// Prepares a co-signer's signature over an inner action.
pub fn prepare_inner(
    ctx: &SigningContext,
    multi_sig_user: &Address,
    outer_signer: &Address,
    action: &Action,
    nonce: u64,
    category: ActionCategory,
) -> Result<PreparedAction> {
    match category {
        ActionCategory::L1 => {
            let payload = inner_l1_payload(multi_sig_user, outer_signer, action);
            let connection_id = value_hash(
                &payload,
                nonce,
                ctx.vault_address.as_ref(),
                ctx.expires_after,
            )?;
            let document = TypedDataDocument::l1_agent(connection_id, ctx.chain);
            let signing_hash = document.signing_hash()?;

            debug!(
                multi_sig_user = %multi_sig_user,
                nonce,
                connection_id = %connection_id,
                "Prepared multi-sig inner L1 action"
            );

            Ok(PreparedAction {
                action: action.clone(),
                nonce,
                vault_address: ctx.posted_vault(action),
                expires_after: ctx.expires_after,
                document,
                signing_hash,
                connection_id: Some(connection_id),
            })
        }
        ActionCategory::UserSigned(PrimaryType::SendMultiSig) => Err(Error::UnsupportedValue(
            "multi-sig envelopes cannot be nested".to_string(),
        )),
        ActionCategory::UserSigned(primary) => {
            check_action_type(primary, action)?;

            let stamped = with_chain_fields(action, ctx.chain);
            let (signed, posted) = user_signed::signing_forms(primary, stamped);
            let message = signed
                .with("payloadMultiSigUser", *multi_sig_user)
                .with("outerSigner", *outer_signer);

            let document = TypedDataDocument::new(
                Eip712Domain::user_signed(),
                primary.type_name(),
                primary.multi_sig_fields(),
                message.to_json_map(),
            );
            let signing_hash = document.signing_hash()?;

            debug!(
                multi_sig_user = %multi_sig_user,
                primary_type = %primary,
                nonce,
                "Prepared multi-sig inner user-signed action"
            );

            Ok(PreparedAction {
                vault_address: ctx.posted_vault(&posted),
                action: posted,
                nonce,
                expires_after: ctx.expires_after,
                document,
                signing_hash,
                connection_id: None,
            })
        }
    }
}

/// `{r, s, v}` as carried inside an envelope. `r` and `s` are minimal
/// `0x` hex, the form the reference client emits.
pub fn signature_entry(signature: &Signature) -> Action {
    Action::new()
        .with("r", minimal_hex(signature.r().as_slice()))
        .with("s", minimal_hex(signature.s().as_slice()))
        .with("v", signature.v())
}

fn minimal_hex(word: &[u8]) -> String {
    let digits = hex::encode(word);
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        "0x0".to_string()
    } else {
        format!("0x{}", trimmed)
    }
}

/// Builds the `multiSig` envelope posted by the outer signer.
pub fn envelope(
    multi_sig_user: &Address,
    outer_signer: &Address,
    inner_action: &Action,
    signatures: &[Signature],
) -> Action {
    let signatures: Vec<ActionValue> = signatures
        .iter()
        .map(|s| ActionValue::Map(signature_entry(s)))
        .collect();

    Action::typed("multiSig")
        .with("signatureChainId", SIGNATURE_CHAIN_ID)
        .with("signatures", signatures)
        .with(
            "payload",
            Action::new()
                .with("multiSigUser", *multi_sig_user)
                .with("outerSigner", *outer_signer)
                .with("action", inner_action.clone()),
        )
}

/// Prepares the outer signer's signature over an envelope.
///
/// The envelope is hashed without its `type` tag, then the hash is signed as
/// `SendMultiSig {multiSigActionHash, nonce}`.
pub fn prepare_envelope(
    ctx: &SigningContext,
    envelope: &Action,
    nonce: u64,
) -> Result<PreparedAction> {
    check_action_type(PrimaryType::SendMultiSig, envelope)?;

    let mut untagged = envelope.clone();
    untagged.remove("type");
    let envelope_hash = action_hash(
        &untagged,
        nonce,
        ctx.vault_address.as_ref(),
        ctx.expires_after,
    )?;

    let message = with_chain_fields(
        &Action::new()
            .with("multiSigActionHash", envelope_hash)
            .with("nonce", nonce),
        ctx.chain,
    );
    let document = TypedDataDocument::user_signed(PrimaryType::SendMultiSig, &message);
    let signing_hash = document.signing_hash()?;

    debug!(
        nonce,
        envelope_hash = %envelope_hash,
        "Prepared multi-sig envelope"
    );

    Ok(PreparedAction {
        action: envelope.clone(),
        nonce,
        vault_address: ctx.posted_vault(envelope),
        expires_after: ctx.expires_after,
        document,
        signing_hash,
        connection_id: Some(envelope_hash),
    })
}
