//! Builders for user-signed actions.
//!
//! These return the action without `hyperliquidChain`/`signatureChainId`;
//! [`SigningContext`](crate::signing::SigningContext) adds both when the
//! action is prepared.

use alloy_primitives::Address;
use rust_decimal::Decimal;

use crate::signing::PrimaryType;
use crate::types::{address_to_wire, Action, ActionValue};
use crate::wire::to_wire_string;
use crate::Result;

pub fn usd_send(destination: &Address, amount: Decimal, time: u64) -> Result<Action> {
    Ok(Action::typed("usdSend")
        .with("destination", *destination)
        .with("amount", to_wire_string(amount)?)
        .with("time", time))
}

/// `token` is `NAME:0x<token id>`.
pub fn spot_send(destination: &Address, token: &str, amount: Decimal, time: u64) -> Result<Action> {
    Ok(Action::typed("spotSend")
        .with("destination", *destination)
        .with("token", token)
        .with("amount", to_wire_string(amount)?)
        .with("time", time))
}

pub fn withdraw(destination: &Address, amount: Decimal, time: u64) -> Result<Action> {
    Ok(Action::typed("withdraw3")
        .with("destination", *destination)
        .with("amount", to_wire_string(amount)?)
        .with("time", time))
}

/// Moves USD between spot and perp. With a vault, the amount is qualified
/// with ` subaccount:<vault>`.
pub fn usd_class_transfer(
    amount: Decimal,
    to_perp: bool,
    nonce: u64,
    vault_address: Option<&Address>,
) -> Result<Action> {
    let mut amount = to_wire_string(amount)?;
    if let Some(vault) = vault_address {
        amount = format!("{} subaccount:{}", amount, address_to_wire(vault));
    }

    Ok(Action::typed("usdClassTransfer")
        .with("amount", amount)
        .with("toPerp", to_perp)
        .with("nonce", nonce))
}

/// Moves a token between dexes or accounts. `fromSubAccount` is the vault
/// when one is set, otherwise empty.
#[allow(clippy::too_many_arguments)]
pub fn send_asset(
    destination: &Address,
    source_dex: &str,
    destination_dex: &str,
    token: &str,
    amount: Decimal,
    nonce: u64,
    vault_address: Option<&Address>,
) -> Result<Action> {
    let from_sub_account = vault_address.map(address_to_wire).unwrap_or_default();

    Ok(Action::typed("sendAsset")
        .with("destination", *destination)
        .with("sourceDex", source_dex)
        .with("destinationDex", destination_dex)
        .with("token", token)
        .with("amount", to_wire_string(amount)?)
        .with("fromSubAccount", from_sub_account)
        .with("nonce", nonce))
}

pub fn token_delegate(validator: &Address, wei: u64, is_undelegate: bool, nonce: u64) -> Action {
    Action::typed("tokenDelegate")
        .with("validator", *validator)
        .with("wei", wei)
        .with("isUndelegate", is_undelegate)
        .with("nonce", nonce)
}

/// Approves an API agent. An unnamed agent is signed with an empty name
/// and posted without the `agentName` key.
pub fn approve_agent(agent_address: &Address, agent_name: Option<&str>, nonce: u64) -> Action {
    let name = match agent_name {
        Some(name) => ActionValue::from(name),
        None => ActionValue::Nil,
    };

    Action::typed("approveAgent")
        .with("agentAddress", *agent_address)
        .with("agentName", name)
        .with("nonce", nonce)
}

/// `max_fee_rate` is a percentage string such as `"0.001%"`.
pub fn approve_builder_fee(builder: &Address, max_fee_rate: &str, nonce: u64) -> Action {
    Action::typed("approveBuilderFee")
        .with("maxFeeRate", max_fee_rate)
        .with("builder", *builder)
        .with("nonce", nonce)
}

/// Converts the signing account into a multi-sig user.
pub fn convert_to_multi_sig_user(authorized_users: &[Address], threshold: u32, nonce: u64) -> Action {
    Action::typed("convertToMultiSigUser")
        .with("signers", multi_sig_signers(authorized_users, threshold))
        .with("nonce", nonce)
}

/// `{"authorizedUsers": [...], "threshold": n}` with sorted lowercase users,
/// spaced the way the reference client serializes it.
pub fn multi_sig_signers(authorized_users: &[Address], threshold: u32) -> String {
    let mut users: Vec<String> = authorized_users.iter().map(address_to_wire).collect();
    users.sort();
    let quoted: Vec<String> = users.iter().map(|u| format!("\"{}\"", u)).collect();
    format!(
        "{{\"authorizedUsers\": [{}], \"threshold\": {}}}",
        quoted.join(", "),
        threshold
    )
}

pub fn user_dex_abstraction(user: &Address, enabled: bool, nonce: u64) -> Action {
    Action::typed("userDexAbstraction")
        .with("user", *user)
        .with("enabled", enabled)
        .with("nonce", nonce)
}

/// Splits a stamped action into the form that is signed and the form that
/// is posted.
pub(crate) fn signing_forms(primary: PrimaryType, action: Action) -> (Action, Action) {
    match primary {
        PrimaryType::ApproveAgent if action.get("agentName") == Some(&ActionValue::Nil) => {
            let mut signed = action.clone();
            signed.insert("agentName", "");
            let mut posted = action;
            posted.remove("agentName");
            (signed, posted)
        }
        _ => (action.clone(), action),
    }
}
