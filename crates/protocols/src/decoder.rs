//! Decoder for chain call return values.
//!
//! A return value reaches the client in one of two shapes: a `[bytes, type]`
//! pair from a `devInspect` call, or an already-decoded JSON scalar from an
//! event or object payload. Both are matched exhaustively into a
//! [`DecodedValue`]; anything unrecognised is an explicit [`DecodeError`].

use crate::error::DecodeError;
use crate::wire;
use primitive_types::U256;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use suitrump_domain::math::{IntegerWidth, u256_from_le_bytes};
use suitrump_domain::type_tag::{TypeTag, normalize_type_string, parse_type_tag};
use tracing::warn;

/// A raw return value as delivered by the chain client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawReturnValue {
    /// BCS bytes plus the Move type they encode.
    Tagged(Vec<u8>, String),
    /// JSON value already decoded by the node.
    Scalar(Value),
}

impl RawReturnValue {
    pub fn tagged(bytes: impl Into<Vec<u8>>, type_tag: impl Into<String>) -> Self {
        Self::Tagged(bytes.into(), type_tag.into())
    }
}

/// Wire encodings the decoder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    Integer(IntegerWidth),
    Bool,
    String,
    Address,
    Bytes,
    TypeName,
    TypeNames,
}

fn is_string_struct(tag: &TypeTag) -> bool {
    matches!(tag, TypeTag::Struct(s)
        if s.address == suitrump_domain::type_tag::normalize_address("0x1")
            && (s.module == "string" || s.module == "ascii")
            && s.name == "String")
}

fn is_type_name_struct(tag: &TypeTag) -> bool {
    matches!(tag, TypeTag::Struct(s)
        if s.address == suitrump_domain::type_tag::normalize_address("0x1")
            && s.module == "type_name"
            && s.name == "TypeName")
}

impl WireType {
    /// Resolves a Move type tag to its wire encoding.
    pub fn from_tag(tag: &str) -> Result<Self, DecodeError> {
        let trimmed = tag.trim();
        if trimmed.eq_ignore_ascii_case("string") {
            return Ok(Self::String);
        }
        let parsed =
            parse_type_tag(trimmed).map_err(|_| DecodeError::UnsupportedType(tag.to_string()))?;
        match &parsed {
            TypeTag::Integer(width) => Ok(Self::Integer(*width)),
            TypeTag::Bool => Ok(Self::Bool),
            TypeTag::Address => Ok(Self::Address),
            TypeTag::Vector(inner) if **inner == TypeTag::Integer(IntegerWidth::U8) => Ok(Self::Bytes),
            TypeTag::Vector(inner) if is_type_name_struct(inner) => Ok(Self::TypeNames),
            t if is_string_struct(t) => Ok(Self::String),
            t if is_type_name_struct(t) => Ok(Self::TypeName),
            _ => Err(DecodeError::UnsupportedType(tag.to_string())),
        }
    }
}

/// A decoded chain value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecodedValue {
    Text(String),
    Bool(bool),
    Integer(U256),
    Address(String),
    Bytes(Vec<u8>),
    TypeNames(Vec<String>),
}

impl DecodedValue {
    pub fn zero() -> Self {
        Self::Integer(U256::zero())
    }

    pub fn as_u256(&self) -> Option<U256> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Address(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for DecodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) | Self::Address(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Integer(v) => write!(f, "{}", v),
            Self::Bytes(bytes) => f.write_str(&wire::to_hex(bytes)),
            Self::TypeNames(names) => write!(f, "[{}]", names.join(", ")),
        }
    }
}

fn decode_tagged(bytes: &[u8], tag: &str) -> Result<DecodedValue, DecodeError> {
    match WireType::from_tag(tag)? {
        WireType::Integer(width) => {
            let value = u256_from_le_bytes(bytes)?;
            if value > width.max_value() {
                return Err(DecodeError::Malformed {
                    type_tag: tag.to_string(),
                    reason: format!("{} bytes exceed {}", bytes.len(), width),
                });
            }
            Ok(DecodedValue::Integer(value))
        }
        WireType::Bool => wire::read_bool(bytes).map(DecodedValue::Bool),
        WireType::String => Ok(DecodedValue::Text(wire::read_string(bytes))),
        WireType::Address => wire::read_address(bytes).map(DecodedValue::Address),
        WireType::Bytes => wire::read_byte_vector(bytes).map(DecodedValue::Bytes),
        WireType::TypeName => wire::read_type_name(bytes).map(DecodedValue::Text),
        WireType::TypeNames => wire::read_type_names(bytes).map(DecodedValue::TypeNames),
    }
}

fn decode_string_scalar(s: &str) -> Result<DecodedValue, DecodeError> {
    if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
        return U256::from_dec_str(s)
            .map(DecodedValue::Integer)
            .map_err(|e| DecodeError::Malformed {
                type_tag: "u256".to_string(),
                reason: format!("{:?}", e),
            });
    }
    if let Some(hex) = s.strip_prefix("0x") {
        if hex.len() == 64 && hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Ok(DecodedValue::Address(s.to_ascii_lowercase()));
        }
        if !hex.is_empty() && hex.len() <= 64 && hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return U256::from_str_radix(hex, 16)
                .map(DecodedValue::Integer)
                .map_err(|e| DecodeError::Malformed {
                    type_tag: "hex".to_string(),
                    reason: format!("{:?}", e),
                });
        }
    }
    Ok(DecodedValue::Text(s.to_string()))
}

fn decode_scalar(value: &Value) -> Result<DecodedValue, DecodeError> {
    match value {
        Value::Bool(b) => Ok(DecodedValue::Bool(*b)),
        Value::Number(n) => n
            .as_u64()
            .map(|v| DecodedValue::Integer(U256::from(v)))
            .ok_or_else(|| DecodeError::UnexpectedShape(format!("non-integer number {}", n))),
        Value::String(s) => decode_string_scalar(s),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_u64()
                    .and_then(|v| u8::try_from(v).ok())
                    .ok_or_else(|| DecodeError::UnexpectedShape(format!("non-byte element {}", item)))
            })
            .collect::<Result<Vec<u8>, _>>()
            .map(DecodedValue::Bytes),
        // TypeName as rendered in event JSON: {"name": "..."}
        Value::Object(map) => match map.get("name").and_then(Value::as_str) {
            Some(name) if map.len() == 1 => Ok(DecodedValue::Text(normalize_type_string(name))),
            _ => Err(DecodeError::UnexpectedShape(value.to_string())),
        },
        Value::Null => Err(DecodeError::UnexpectedShape("null".to_string())),
    }
}

/// Decodes a raw return value.
pub fn decode(raw: &RawReturnValue) -> Result<DecodedValue, DecodeError> {
    match raw {
        RawReturnValue::Tagged(bytes, tag) => decode_tagged(bytes, tag),
        RawReturnValue::Scalar(value) => decode_scalar(value),
    }
}

/// Decodes a raw return value, logging failures and yielding zero.
///
/// For rendering paths that must keep going on a bad value.
pub fn decode_or_default(raw: &RawReturnValue) -> DecodedValue {
    decode(raw).unwrap_or_else(|e| {
        warn!(error = %e, value = ?raw, "Failed to decode chain value, using zero");
        DecodedValue::zero()
    })
}

/// Decodes a value that must be an integer.
pub fn decode_u256(raw: &RawReturnValue) -> Result<U256, DecodeError> {
    let decoded = decode(raw)?;
    decoded
        .as_u256()
        .ok_or_else(|| DecodeError::UnexpectedShape(format!("expected integer, got {}", decoded)))
}

/// Decodes a value that must be text.
pub fn decode_string(raw: &RawReturnValue) -> Result<String, DecodeError> {
    match decode(raw)? {
        DecodedValue::Text(s) | DecodedValue::Address(s) => Ok(s),
        other => Err(DecodeError::UnexpectedShape(format!("expected text, got {}", other))),
    }
}

/// Reads an unsigned integer from JSON that may be a number or a numeric string.
pub fn json_u256(value: &Value) -> Result<U256, DecodeError> {
    decode_scalar(value)?
        .as_u256()
        .ok_or_else(|| DecodeError::UnexpectedShape(format!("expected integer, got {}", value)))
}

/// Like [`json_u256`], bounded to u64.
pub fn json_u64(value: &Value) -> Result<u64, DecodeError> {
    let wide = json_u256(value)?;
    if wide > U256::from(u64::MAX) {
        return Err(DecodeError::Malformed {
            type_tag: "u64".to_string(),
            reason: format!("{} exceeds u64", wide),
        });
    }
    Ok(wide.as_u64())
}

/// Serde adapter for u64 fields sent as strings.
pub fn de_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    json_u64(&value).map_err(serde::de::Error::custom)
}
