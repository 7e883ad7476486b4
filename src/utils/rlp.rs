// RLP encoding utilities for Ethereum data structures
//
// A value is either a byte string or a list of values. Encoding is
// canonical; the decoder accepts only canonical input so that
// decode(encode(v)) == v and no two values share an encoding.

use crate::constants::rlp_prefix::{
    LIST_BASE, LONG_LIST_OFFSET, LONG_STRING_OFFSET, MAX_NESTING_DEPTH, SHORT_PAYLOAD_MAX,
    STRING_BASE,
};
use crate::error::{CodecError, Result};
use crate::utils::bytes::{bytes_to_hex, hex_to_bytes, minimal_bytes};
use alloy_primitives::U256;
use serde_json::Value;

/// A recursive RLP item
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RlpValue {
    Bytes(Vec<u8>),
    List(Vec<RlpValue>),
}

impl RlpValue {
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        RlpValue::Bytes(bytes.into())
    }

    pub fn list(items: impl IntoIterator<Item = RlpValue>) -> Self {
        RlpValue::List(items.into_iter().collect())
    }

    /// Byte string holding the minimal big-endian encoding of `value`
    pub fn uint(value: U256) -> Self {
        RlpValue::Bytes(minimal_bytes(value))
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            RlpValue::Bytes(bytes) => Some(bytes),
            RlpValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[RlpValue]> {
        match self {
            RlpValue::Bytes(_) => None,
            RlpValue::List(items) => Some(items),
        }
    }

    /// Encode to RLP bytes
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.encode_into(&mut buf)?;
        Ok(buf)
    }

    /// Append the encoding to `out`
    pub fn encode_into(&self, out: &mut Vec<u8>) -> Result<()> {
        match self {
            RlpValue::Bytes(bytes) if bytes.len() == 1 && bytes[0] < STRING_BASE => {
                out.push(bytes[0]);
            }
            RlpValue::Bytes(bytes) => {
                out.extend(encode_header(STRING_BASE, bytes.len())?);
                out.extend_from_slice(bytes);
            }
            RlpValue::List(items) => {
                let mut payload = Vec::new();
                for item in items {
                    item.encode_into(&mut payload)?;
                }
                out.extend(encode_header(LIST_BASE, payload.len())?);
                out.extend(payload);
            }
        }
        Ok(())
    }
}

impl TryFrom<&Value> for RlpValue {
    type Error = CodecError;

    /// Hex strings become byte strings and arrays become lists
    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::String(text) => Ok(RlpValue::Bytes(hex_to_bytes(text)?)),
            Value::Array(items) => items
                .iter()
                .map(RlpValue::try_from)
                .collect::<Result<Vec<_>>>()
                .map(RlpValue::List),
            Value::Null => Err(CodecError::UnsupportedValue { kind: "null" }),
            Value::Bool(_) => Err(CodecError::UnsupportedValue { kind: "boolean" }),
            Value::Number(_) => Err(CodecError::UnsupportedValue { kind: "number" }),
            Value::Object(_) => Err(CodecError::UnsupportedValue { kind: "object" }),
        }
    }
}

impl From<&RlpValue> for Value {
    fn from(value: &RlpValue) -> Self {
        match value {
            RlpValue::Bytes(bytes) => Value::String(format!("0x{}", bytes_to_hex(bytes))),
            RlpValue::List(items) => Value::Array(items.iter().map(Value::from).collect()),
        }
    }
}

/// Encode a value to RLP bytes
pub fn encode(value: &RlpValue) -> Result<Vec<u8>> {
    value.encode()
}

/// Length header for a payload of `length` bytes
///
/// One byte `base + length` up to 55 bytes, otherwise
/// `base + 55 + len(enc)` followed by the minimal big-endian length `enc`.
pub fn encode_header(base: u8, length: usize) -> Result<Vec<u8>> {
    let length64 = u64::try_from(length).map_err(|_| CodecError::LengthOutOfRange {
        length: length as u128,
    })?;

    if length <= SHORT_PAYLOAD_MAX {
        return Ok(vec![encode_int8(base as usize + length)?]);
    }

    let length_bytes = minimal_bytes(U256::from(length64));
    let mut header = Vec::with_capacity(1 + length_bytes.len());
    header.push(encode_int8(
        base as usize + SHORT_PAYLOAD_MAX + length_bytes.len(),
    )?);
    header.extend(length_bytes);
    Ok(header)
}

/// Encode an 8-bit integer
pub fn encode_int8(value: usize) -> Result<u8> {
    u8::try_from(value)
        .map_err(|_| CodecError::out_of_range(format!("{value} does not fit in one byte")))
}

/// Split the first byte off the input
pub fn decode_int8(input: &[u8]) -> Result<(u8, &[u8])> {
    input
        .split_first()
        .map(|(first, rest)| (*first, rest))
        .ok_or(CodecError::UnexpectedEnd {
            needed: 1,
            available: 0,
        })
}

/// Decode exactly one item spanning the whole input
pub fn decode(input: &[u8]) -> Result<RlpValue> {
    let (value, rest) = decode_prefix(input)?;
    if !rest.is_empty() {
        return Err(CodecError::TrailingBytes { count: rest.len() });
    }
    Ok(value)
}

/// Decode one item from the front of the input, returning the remainder
///
/// Lists nested deeper than `MAX_NESTING_DEPTH` fail with `RecursionLimit`.
pub fn decode_prefix(input: &[u8]) -> Result<(RlpValue, &[u8])> {
    decode_item(input, 0)
}

/// `depth` counts the lists enclosing the item
fn decode_item(input: &[u8], depth: usize) -> Result<(RlpValue, &[u8])> {
    let (prefix, rest) = decode_int8(input)?;
    if prefix >= LIST_BASE && depth >= MAX_NESTING_DEPTH {
        return Err(CodecError::RecursionLimit {
            depth: MAX_NESTING_DEPTH,
        });
    }
    match prefix {
        0x00..=0x7f => Ok((RlpValue::Bytes(vec![prefix]), rest)),
        0x80..=0xb7 => {
            let (payload, rest) = take(rest, (prefix - STRING_BASE) as usize)?;
            if payload.len() == 1 && payload[0] < STRING_BASE {
                return Err(CodecError::NonCanonicalEncoding {
                    reason: "single byte below 0x80 carries a header",
                });
            }
            Ok((RlpValue::Bytes(payload.to_vec()), rest))
        }
        0xb8..=0xbf => {
            let (length, rest) = decode_long_length(rest, (prefix - LONG_STRING_OFFSET) as usize)?;
            let (payload, rest) = take(rest, length)?;
            Ok((RlpValue::Bytes(payload.to_vec()), rest))
        }
        0xc0..=0xf7 => {
            let (payload, rest) = take(rest, (prefix - LIST_BASE) as usize)?;
            Ok((RlpValue::List(decode_list_payload(payload, depth + 1)?), rest))
        }
        0xf8..=0xff => {
            let (length, rest) = decode_long_length(rest, (prefix - LONG_LIST_OFFSET) as usize)?;
            let (payload, rest) = take(rest, length)?;
            Ok((RlpValue::List(decode_list_payload(payload, depth + 1)?), rest))
        }
    }
}

fn decode_long_length(input: &[u8], size: usize) -> Result<(usize, &[u8])> {
    let (length_bytes, rest) = take(input, size)?;
    if length_bytes[0] == 0 {
        return Err(CodecError::NonCanonicalEncoding {
            reason: "length field has a leading zero byte",
        });
    }

    // size is at most 8, so the length always fits in 64 bits
    let length = length_bytes
        .iter()
        .fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte));
    if length <= SHORT_PAYLOAD_MAX as u64 {
        return Err(CodecError::NonCanonicalEncoding {
            reason: "long form used for a payload of at most 55 bytes",
        });
    }

    let length = usize::try_from(length).map_err(|_| CodecError::LengthOutOfRange {
        length: length as u128,
    })?;
    Ok((length, rest))
}

fn decode_list_payload(mut payload: &[u8], depth: usize) -> Result<Vec<RlpValue>> {
    let mut items = Vec::new();
    while !payload.is_empty() {
        let (item, rest) = decode_item(payload, depth)?;
        items.push(item);
        payload = rest;
    }
    Ok(items)
}

fn take(input: &[u8], length: usize) -> Result<(&[u8], &[u8])> {
    if input.len() < length {
        return Err(CodecError::UnexpectedEnd {
            needed: length,
            available: input.len(),
        });
    }
    Ok(input.split_at(length))
}
