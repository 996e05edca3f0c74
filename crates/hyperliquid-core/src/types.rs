//! Core domain types for action signing.

pub mod action;
pub mod chain;
pub mod cloid;
pub mod signature;

pub use action::*;
pub use chain::*;
pub use cloid::*;
pub use signature::*;
