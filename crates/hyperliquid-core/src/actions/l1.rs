//! Builders for L1 actions.
//!
//! Key order matches the exchange's reference client; it is part of the
//! hashed content.

use alloy_primitives::Address;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{address_to_wire, Action, ActionValue, Cloid};
use crate::wire::{to_usd_int, to_wire_string};
use crate::Result;

/// Time in force for limit orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tif {
    /// Add liquidity only (post only).
    Alo,
    /// Immediate or cancel.
    Ioc,
    /// Good til cancelled.
    Gtc,
}

impl Tif {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tif::Alo => "Alo",
            Tif::Ioc => "Ioc",
            Tif::Gtc => "Gtc",
        }
    }
}

/// Take-profit or stop-loss trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tpsl {
    Tp,
    Sl,
}

impl Tpsl {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tpsl::Tp => "tp",
            Tpsl::Sl => "sl",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderType {
    Limit {
        tif: Tif,
    },
    Trigger {
        is_market: bool,
        trigger_px: Decimal,
        tpsl: Tpsl,
    },
}

impl OrderType {
    fn to_wire(&self) -> Result<Action> {
        Ok(match self {
            OrderType::Limit { tif } => {
                Action::new().with("limit", Action::new().with("tif", tif.as_str()))
            }
            OrderType::Trigger {
                is_market,
                trigger_px,
                tpsl,
            } => Action::new().with(
                "trigger",
                Action::new()
                    .with("isMarket", *is_market)
                    .with("triggerPx", to_wire_string(*trigger_px)?)
                    .with("tpsl", tpsl.as_str()),
            ),
        })
    }
}

/// How orders in one action relate to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Grouping {
    #[default]
    Na,
    NormalTpsl,
    PositionTpsl,
}

impl Grouping {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grouping::Na => "na",
            Grouping::NormalTpsl => "normalTpsl",
            Grouping::PositionTpsl => "positionTpsl",
        }
    }
}

/// A single order before wire conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    pub asset: u32,
    pub is_buy: bool,
    pub limit_px: Decimal,
    pub sz: Decimal,
    pub reduce_only: bool,
    pub order_type: OrderType,
    pub cloid: Option<Cloid>,
}

impl OrderRequest {
    /// Wire form `{a, b, p, s, r, t, c?}`.
    pub fn to_wire(&self) -> Result<Action> {
        Ok(Action::new()
            .with("a", self.asset)
            .with("b", self.is_buy)
            .with("p", to_wire_string(self.limit_px)?)
            .with("s", to_wire_string(self.sz)?)
            .with("r", self.reduce_only)
            .with("t", self.order_type.to_wire()?)
            .with_opt("c", self.cloid.map(|c| c.to_raw())))
    }
}

/// Builder fee attached to an order action. `fee` is in tenths of a basis point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuilderInfo {
    pub builder: Address,
    pub fee: u64,
}

/// An order to modify, addressed by exchange id or client id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderId {
    Oid(u64),
    Cloid(Cloid),
}

impl From<OrderId> for ActionValue {
    fn from(id: OrderId) -> Self {
        match id {
            OrderId::Oid(oid) => ActionValue::UInt(oid),
            OrderId::Cloid(cloid) => ActionValue::Text(cloid.to_raw()),
        }
    }
}

pub fn order(
    orders: &[OrderRequest],
    grouping: Grouping,
    builder: Option<&BuilderInfo>,
) -> Result<Action> {
    let wires = orders
        .iter()
        .map(|o| o.to_wire().map(ActionValue::Map))
        .collect::<Result<Vec<_>>>()?;

    Ok(Action::typed("order")
        .with("orders", wires)
        .with("grouping", grouping.as_str())
        .with_opt(
            "builder",
            builder.map(|b| {
                Action::new()
                    .with("b", address_to_wire(&b.builder))
                    .with("f", b.fee)
            }),
        ))
}

/// Cancels by `(asset, oid)`.
pub fn cancel(cancels: &[(u32, u64)]) -> Action {
    let entries: Vec<ActionValue> = cancels
        .iter()
        .map(|(asset, oid)| ActionValue::Map(Action::new().with("a", *asset).with("o", *oid)))
        .collect();
    Action::typed("cancel").with("cancels", entries)
}

/// Cancels by `(asset, cloid)`.
pub fn cancel_by_cloid(cancels: &[(u32, Cloid)]) -> Action {
    let entries: Vec<ActionValue> = cancels
        .iter()
        .map(|(asset, cloid)| {
            ActionValue::Map(
                Action::new()
                    .with("asset", *asset)
                    .with("cloid", cloid.to_raw()),
            )
        })
        .collect();
    Action::typed("cancelByCloid").with("cancels", entries)
}

pub fn modify(oid: OrderId, order: &OrderRequest) -> Result<Action> {
    Ok(Action::typed("modify")
        .with("oid", oid)
        .with("order", order.to_wire()?))
}

pub fn batch_modify(modifies: &[(OrderId, OrderRequest)]) -> Result<Action> {
    let entries = modifies
        .iter()
        .map(|(oid, order)| {
            Ok(ActionValue::Map(
                Action::new().with("oid", *oid).with("order", order.to_wire()?),
            ))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Action::typed("batchModify").with("modifies", entries))
}

pub fn update_leverage(asset: u32, is_cross: bool, leverage: u32) -> Action {
    Action::typed("updateLeverage")
        .with("asset", asset)
        .with("isCross", is_cross)
        .with("leverage", leverage)
}

/// Adds (or with a negative amount, removes) isolated margin in USD.
pub fn update_isolated_margin(asset: u32, amount: Decimal) -> Result<Action> {
    Ok(Action::typed("updateIsolatedMargin")
        .with("asset", asset)
        .with("isBuy", true)
        .with("ntli", to_usd_int(amount)?))
}

/// Schedules a cancel-all at `time` (ms), or clears the schedule with `None`.
pub fn schedule_cancel(time: Option<u64>) -> Action {
    Action::typed("scheduleCancel").with_opt("time", time)
}

pub fn set_referrer(code: &str) -> Action {
    Action::typed("setReferrer").with("code", code)
}

pub fn create_sub_account(name: &str) -> Action {
    Action::typed("createSubAccount").with("name", name)
}

/// `usd` is in raw USD units (6 decimals).
pub fn sub_account_transfer(sub_account_user: &Address, is_deposit: bool, usd: u64) -> Action {
    Action::typed("subAccountTransfer")
        .with("subAccountUser", *sub_account_user)
        .with("isDeposit", is_deposit)
        .with("usd", usd)
}

/// `usd` is in raw USD units (6 decimals).
pub fn vault_transfer(vault_address: &Address, is_deposit: bool, usd: u64) -> Action {
    Action::typed("vaultTransfer")
        .with("vaultAddress", *vault_address)
        .with("isDeposit", is_deposit)
        .with("usd", usd)
}

pub fn evm_user_modify(using_big_blocks: bool) -> Action {
    Action::typed("evmUserModify").with("usingBigBlocks", using_big_blocks)
}

pub fn noop() -> Action {
    Action::typed("noop")
}

pub fn c_validator_unregister() -> Action {
    Action::typed("CValidatorAction").with("unregister", ActionValue::Nil)
}

pub fn c_signer_jail_self() -> Action {
    Action::typed("CSignerAction").with("jailSelf", ActionValue::Nil)
}

pub fn c_signer_unjail_self() -> Action {
    Action::typed("CSignerAction").with("unjailSelf", ActionValue::Nil)
}
