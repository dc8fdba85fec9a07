//! Clarity value wire codec
//!
//! Serializes read-only call arguments to the node's hex format and decodes
//! hex results into the JSON typed-node tree the rest of the code consumes
//! (`{"type": ..., "value"/"data": ...}`). Only the value types the category
//! contract surface needs are supported; an unknown type tag is an error the
//! caller downgrades to "no data".

use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::chain::c32::{self, C32Error};

const TAG_INT: u8 = 0x00;
const TAG_UINT: u8 = 0x01;
const TAG_BUFFER: u8 = 0x02;
const TAG_TRUE: u8 = 0x03;
const TAG_FALSE: u8 = 0x04;
const TAG_PRINCIPAL_STANDARD: u8 = 0x05;
const TAG_PRINCIPAL_CONTRACT: u8 = 0x06;
const TAG_RESPONSE_OK: u8 = 0x07;
const TAG_RESPONSE_ERR: u8 = 0x08;
const TAG_NONE: u8 = 0x09;
const TAG_SOME: u8 = 0x0a;
const TAG_LIST: u8 = 0x0b;
const TAG_TUPLE: u8 = 0x0c;
const TAG_STRING_ASCII: u8 = 0x0d;
const TAG_STRING_UTF8: u8 = 0x0e;

const MAX_DEPTH: usize = 16;

#[derive(Debug, Error)]
pub enum ClarityError {
    #[error("result is not valid hex: {0}")]
    BadHex(#[from] hex::FromHexError),
    #[error("invalid principal: {0}")]
    Principal(#[from] C32Error),
    #[error("unexpected end of value")]
    UnexpectedEnd,
    #[error("unsupported clarity type tag 0x{0:02x}")]
    UnsupportedType(u8),
    #[error("value nesting too deep")]
    TooDeep,
    #[error("string payload is not valid utf8")]
    InvalidUtf8,
    #[error("trailing bytes after value")]
    TrailingBytes,
}

/// A Clarity argument value for a read-only contract call
#[derive(Debug, Clone, PartialEq)]
pub enum ClarityValue {
    /// Standard principal, given as a c32check address
    Principal(String),
    Buffer(Vec<u8>),
    StringUtf8(String),
}

impl ClarityValue {
    /// Hex wire form, `0x`-prefixed, as the call-read endpoint expects
    pub fn serialize_hex(&self) -> Result<String, ClarityError> {
        let mut bytes = Vec::new();
        match self {
            ClarityValue::Principal(address) => {
                let (version, hash160) = c32::c32_address_decode(address)?;
                bytes.push(TAG_PRINCIPAL_STANDARD);
                bytes.push(version);
                bytes.extend_from_slice(&hash160);
            }
            ClarityValue::Buffer(data) => {
                bytes.push(TAG_BUFFER);
                bytes.extend_from_slice(&(data.len() as u32).to_be_bytes());
                bytes.extend_from_slice(data);
            }
            ClarityValue::StringUtf8(s) => {
                bytes.push(TAG_STRING_UTF8);
                bytes.extend_from_slice(&(s.len() as u32).to_be_bytes());
                bytes.extend_from_slice(s.as_bytes());
            }
        }
        Ok(format!("0x{}", hex::encode(bytes)))
    }
}

/// Decode a hex-encoded Clarity result into the typed-node JSON tree
pub fn decode_hex(result: &str) -> Result<Value, ClarityError> {
    let clean = result.strip_prefix("0x").unwrap_or(result);
    let bytes = hex::decode(clean)?;
    let mut cursor = Cursor {
        data: &bytes,
        pos: 0,
    };
    let value = parse_value(&mut cursor, 0)?;
    if cursor.pos != bytes.len() {
        return Err(ClarityError::TrailingBytes);
    }
    Ok(value)
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], ClarityError> {
        if self.pos + n > self.data.len() {
            return Err(ClarityError::UnexpectedEnd);
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn take_u8(&mut self) -> Result<u8, ClarityError> {
        Ok(self.take(1)?[0])
    }

    fn take_u32(&mut self) -> Result<u32, ClarityError> {
        let bytes = self.take(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}

fn parse_value(cursor: &mut Cursor<'_>, depth: usize) -> Result<Value, ClarityError> {
    if depth > MAX_DEPTH {
        return Err(ClarityError::TooDeep);
    }

    let tag = cursor.take_u8()?;
    match tag {
        TAG_INT => {
            let bytes = cursor.take(16)?;
            let mut buf = [0u8; 16];
            buf.copy_from_slice(bytes);
            Ok(json!({"type": "int", "value": i128::from_be_bytes(buf).to_string()}))
        }
        TAG_UINT => {
            let bytes = cursor.take(16)?;
            let mut buf = [0u8; 16];
            buf.copy_from_slice(bytes);
            Ok(json!({"type": "uint", "value": u128::from_be_bytes(buf).to_string()}))
        }
        TAG_BUFFER => {
            let len = cursor.take_u32()? as usize;
            let data = cursor.take(len)?;
            Ok(json!({"type": "buffer", "value": format!("0x{}", hex::encode(data))}))
        }
        TAG_TRUE => Ok(json!({"type": "bool", "value": true})),
        TAG_FALSE => Ok(json!({"type": "bool", "value": false})),
        TAG_PRINCIPAL_STANDARD => {
            let version = cursor.take_u8()?;
            let mut hash160 = [0u8; 20];
            hash160.copy_from_slice(cursor.take(20)?);
            let address = c32::c32_address_encode(version, &hash160);
            Ok(json!({"type": "principal", "value": address}))
        }
        TAG_PRINCIPAL_CONTRACT => {
            let version = cursor.take_u8()?;
            let mut hash160 = [0u8; 20];
            hash160.copy_from_slice(cursor.take(20)?);
            let name_len = cursor.take_u8()? as usize;
            let name =
                std::str::from_utf8(cursor.take(name_len)?).map_err(|_| ClarityError::InvalidUtf8)?;
            let address = c32::c32_address_encode(version, &hash160);
            Ok(json!({"type": "principal", "value": format!("{}.{}", address, name)}))
        }
        TAG_RESPONSE_OK => {
            let inner = parse_value(cursor, depth + 1)?;
            Ok(json!({"type": "responseOk", "value": inner}))
        }
        TAG_RESPONSE_ERR => {
            let inner = parse_value(cursor, depth + 1)?;
            Ok(json!({"type": "responseErr", "value": inner}))
        }
        TAG_NONE => Ok(json!({"type": "none"})),
        TAG_SOME => {
            let inner = parse_value(cursor, depth + 1)?;
            Ok(json!({"type": "optional", "value": inner}))
        }
        TAG_LIST => {
            let count = cursor.take_u32()? as usize;
            if count > cursor.remaining() {
                return Err(ClarityError::UnexpectedEnd);
            }
            let mut items = Vec::with_capacity(count);
            for _ in 0..count {
                items.push(parse_value(cursor, depth + 1)?);
            }
            Ok(json!({"type": "list", "value": items}))
        }
        TAG_TUPLE => {
            let count = cursor.take_u32()? as usize;
            if count > cursor.remaining() {
                return Err(ClarityError::UnexpectedEnd);
            }
            let mut fields = Map::new();
            for _ in 0..count {
                let name_len = cursor.take_u8()? as usize;
                let name = std::str::from_utf8(cursor.take(name_len)?)
                    .map_err(|_| ClarityError::InvalidUtf8)?
                    .to_string();
                let value = parse_value(cursor, depth + 1)?;
                fields.insert(name, value);
            }
            Ok(json!({"type": "tuple", "data": Value::Object(fields)}))
        }
        TAG_STRING_ASCII => {
            let len = cursor.take_u32()? as usize;
            let s = std::str::from_utf8(cursor.take(len)?)
                .map_err(|_| ClarityError::InvalidUtf8)?;
            Ok(json!({"type": "string-ascii", "value": s}))
        }
        TAG_STRING_UTF8 => {
            let len = cursor.take_u32()? as usize;
            let s = std::str::from_utf8(cursor.take(len)?)
                .map_err(|_| ClarityError::InvalidUtf8)?;
            Ok(json!({"type": "string-utf8", "value": s}))
        }
        other => Err(ClarityError::UnsupportedType(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::c32::c32_address_encode;

    #[test]
    fn test_serialize_buffer_and_string() {
        let buffer = ClarityValue::Buffer(vec![0xde, 0xad]);
        assert_eq!(buffer.serialize_hex().expect("serializes"), "0x0200000002dead");

        let s = ClarityValue::StringUtf8("Income".into());
        assert_eq!(
            s.serialize_hex().expect("serializes"),
            format!("0x0e00000006{}", hex::encode("Income"))
        );
    }

    #[test]
    fn test_serialize_principal_round_trips_through_decode() {
        let address = c32_address_encode(22, &[7u8; 20]);
        let serialized = ClarityValue::Principal(address.clone())
            .serialize_hex()
            .expect("serializes");
        assert!(serialized.starts_with("0x0516"));

        let decoded = decode_hex(&serialized).expect("decodes");
        assert_eq!(decoded["type"], "principal");
        assert_eq!(decoded["value"], Value::String(address));
    }

    #[test]
    fn test_decode_optional_tuple_result() {
        // (some (tuple (category u"Income")))
        let mut bytes = vec![TAG_SOME, TAG_TUPLE];
        bytes.extend_from_slice(&1u32.to_be_bytes());
        bytes.push(8);
        bytes.extend_from_slice(b"category");
        bytes.push(TAG_STRING_UTF8);
        bytes.extend_from_slice(&6u32.to_be_bytes());
        bytes.extend_from_slice(b"Income");

        let decoded = decode_hex(&format!("0x{}", hex::encode(&bytes))).expect("decodes");
        assert_eq!(decoded["type"], "optional");
        assert_eq!(decoded["value"]["type"], "tuple");
        assert_eq!(decoded["value"]["data"]["category"]["value"], "Income");
    }

    #[test]
    fn test_decode_none_and_errors() {
        assert_eq!(decode_hex("0x09").expect("decodes")["type"], "none");
        // unknown tag
        assert!(decode_hex("0xff").is_err());
        // truncated string
        assert!(decode_hex("0x0e00000006496e").is_err());
        // trailing bytes after a complete value
        assert!(decode_hex("0x0900").is_err());
    }

    #[test]
    fn test_decode_uint_and_bool() {
        let mut bytes = vec![TAG_UINT];
        bytes.extend_from_slice(&42u128.to_be_bytes());
        let decoded = decode_hex(&hex::encode(&bytes)).expect("decodes");
        assert_eq!(decoded["value"], "42");

        assert_eq!(decode_hex("0x03").expect("decodes")["value"], true);
    }
}
