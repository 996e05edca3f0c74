//! Canonical binary encoding of action trees.
//!
//! The format is MessagePack as produced by the exchange's reference client:
//! every value takes the smallest tag that represents it exactly, strings
//! are UTF-8 `str` (never `bin`), and maps are written in stored order.

use crate::types::{Action, ActionValue};
use crate::{Error, Result};

const NIL: u8 = 0xc0;
const FALSE: u8 = 0xc2;
const TRUE: u8 = 0xc3;

const BIN8: u8 = 0xc4;
const BIN16: u8 = 0xc5;
const BIN32: u8 = 0xc6;

const UINT8: u8 = 0xcc;
const UINT16: u8 = 0xcd;
const UINT32: u8 = 0xce;
const UINT64: u8 = 0xcf;
const INT8: u8 = 0xd0;
const INT16: u8 = 0xd1;
const INT32: u8 = 0xd2;
const INT64: u8 = 0xd3;

const FIXSTR: u8 = 0xa0;
const STR8: u8 = 0xd9;
const STR16: u8 = 0xda;
const STR32: u8 = 0xdb;

const FIXARRAY: u8 = 0x90;
const ARRAY16: u8 = 0xdc;
const ARRAY32: u8 = 0xdd;

const FIXMAP: u8 = 0x80;
const MAP16: u8 = 0xde;
const MAP32: u8 = 0xdf;

/// Encodes an action as a map.
pub fn encode(action: &Action) -> Result<Vec<u8>> {
    let mut encoder = Encoder::default();
    encoder.write_map(action)?;
    Ok(encoder.into_bytes())
}

/// Encodes any action value. Used for non-map roots such as multi-sig payloads.
pub fn encode_value(value: &ActionValue) -> Result<Vec<u8>> {
    let mut encoder = Encoder::default();
    encoder.write_value(value)?;
    Ok(encoder.into_bytes())
}

#[derive(Debug, Default)]
struct Encoder {
    buf: Vec<u8>,
}

impl Encoder {
    fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    fn write_value(&mut self, value: &ActionValue) -> Result<()> {
        match value {
            ActionValue::Nil => self.buf.push(NIL),
            ActionValue::Bool(b) => self.buf.push(if *b { TRUE } else { FALSE }),
            ActionValue::Int(i) => self.write_int(*i as i128)?,
            ActionValue::UInt(u) => self.write_int(*u as i128)?,
            ActionValue::BigInt(i) => self.write_int(*i)?,
            ActionValue::Text(s) => self.write_str(s)?,
            ActionValue::Bytes(b) => self.write_bin(b)?,
            ActionValue::Map(action) => self.write_map(action)?,
            ActionValue::List(items) => {
                self.write_len(items.len(), FIXARRAY, 15, ARRAY16, ARRAY32)?;
                for item in items {
                    self.write_value(item)?;
                }
            }
        }
        Ok(())
    }

    fn write_map(&mut self, action: &Action) -> Result<()> {
        self.write_len(action.len(), FIXMAP, 15, MAP16, MAP32)?;
        for (key, value) in action.iter() {
            self.write_str(key)?;
            self.write_value(value)?;
        }
        Ok(())
    }

    /// Smallest exact integer form. Non-negative values always use the
    /// unsigned family.
    fn write_int(&mut self, value: i128) -> Result<()> {
        if value >= 0 {
            let v = u64::try_from(value).map_err(|_| {
                Error::UnsupportedValue(format!("integer {} does not fit in 64 bits", value))
            })?;
            if v <= 0x7f {
                self.buf.push(v as u8);
            } else if v <= u8::MAX as u64 {
                self.buf.push(UINT8);
                self.buf.push(v as u8);
            } else if v <= u16::MAX as u64 {
                self.buf.push(UINT16);
                self.buf.extend_from_slice(&(v as u16).to_be_bytes());
            } else if v <= u32::MAX as u64 {
                self.buf.push(UINT32);
                self.buf.extend_from_slice(&(v as u32).to_be_bytes());
            } else {
                self.buf.push(UINT64);
                self.buf.extend_from_slice(&v.to_be_bytes());
            }
        } else {
            let v = i64::try_from(value).map_err(|_| {
                Error::UnsupportedValue(format!("integer {} does not fit in 64 bits", value))
            })?;
            if v >= -32 {
                // negative fixint
                self.buf.push(v as i8 as u8);
            } else if v >= i8::MIN as i64 {
                self.buf.push(INT8);
                self.buf.push(v as i8 as u8);
            } else if v >= i16::MIN as i64 {
                self.buf.push(INT16);
                self.buf.extend_from_slice(&(v as i16).to_be_bytes());
            } else if v >= i32::MIN as i64 {
                self.buf.push(INT32);
                self.buf.extend_from_slice(&(v as i32).to_be_bytes());
            } else {
                self.buf.push(INT64);
                self.buf.extend_from_slice(&v.to_be_bytes());
            }
        }
        Ok(())
    }

    fn write_str(&mut self, s: &str) -> Result<()> {
        let bytes = s.as_bytes();
        let len = bytes.len();
        if len < 32 {
            self.buf.push(FIXSTR | len as u8);
        } else if len <= u8::MAX as usize {
            self.buf.push(STR8);
            self.buf.push(len as u8);
        } else if len <= u16::MAX as usize {
            self.buf.push(STR16);
            self.buf.extend_from_slice(&(len as u16).to_be_bytes());
        } else {
            let len = u32::try_from(len).map_err(|_| {
                Error::UnsupportedValue(format!("string of {} bytes is too long", len))
            })?;
            self.buf.push(STR32);
            self.buf.extend_from_slice(&len.to_be_bytes());
        }
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    fn write_bin(&mut self, bytes: &[u8]) -> Result<()> {
        let len = bytes.len();
        if len <= u8::MAX as usize {
            self.buf.push(BIN8);
            self.buf.push(len as u8);
        } else if len <= u16::MAX as usize {
            self.buf.push(BIN16);
            self.buf.extend_from_slice(&(len as u16).to_be_bytes());
        } else {
            let len = u32::try_from(len).map_err(|_| {
                Error::UnsupportedValue(format!("byte string of {} bytes is too long", len))
            })?;
            self.buf.push(BIN32);
            self.buf.extend_from_slice(&len.to_be_bytes());
        }
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    /// Collection header: fix form up to `fix_max` entries, then 16/32-bit counts.
    fn write_len(&mut self, len: usize, fix: u8, fix_max: usize, tag16: u8, tag32: u8) -> Result<()> {
        if len <= fix_max {
            self.buf.push(fix | len as u8);
        } else if len <= u16::MAX as usize {
            self.buf.push(tag16);
            self.buf.extend_from_slice(&(len as u16).to_be_bytes());
        } else {
            let len = u32::try_from(len).map_err(|_| {
                Error::UnsupportedValue(format!("collection of {} entries is too large", len))
            })?;
            self.buf.push(tag32);
            self.buf.extend_from_slice(&len.to_be_bytes());
        }
        Ok(())
    }
}
