//! Wire-level encodings: decimal formatting and the canonical binary form
//! of actions.

pub mod msgpack;
pub mod numeric;

pub use msgpack::{encode, encode_value};
pub use numeric::{
    to_hash_int, to_scaled_integer, to_usd_int, to_wire_string, HASH_SCALE, USD_SCALE,
    WIRE_DECIMALS,
};
