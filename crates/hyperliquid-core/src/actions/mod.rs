//! Builders for exchange actions.
//!
//! Each builder emits entries in the order the exchange expects; that order
//! is part of the signed content.

pub mod l1;
pub mod user_signed;

pub use l1::{BuilderInfo, Grouping, OrderId, OrderRequest, OrderType, Tif, Tpsl};
