use crate::error::{DomainError, Result};
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Width of a Move unsigned integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntegerWidth {
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
}

impl IntegerWidth {
    /// Number of bytes in the BCS encoding.
    pub fn byte_len(&self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::U32 => 4,
            Self::U64 => 8,
            Self::U128 => 16,
            Self::U256 => 32,
        }
    }

    /// Largest value representable in this width.
    pub fn max_value(&self) -> U256 {
        if *self == Self::U256 {
            U256::MAX
        } else {
            (U256::one() << (self.byte_len() * 8)) - U256::one()
        }
    }
}

impl FromStr for IntegerWidth {
    type Err = DomainError;

    fn from_str(tag: &str) -> Result<Self> {
        match tag.trim() {
            "u8" => Ok(Self::U8),
            "u16" => Ok(Self::U16),
            "u32" => Ok(Self::U32),
            "u64" => Ok(Self::U64),
            "u128" => Ok(Self::U128),
            "u256" => Ok(Self::U256),
            other => Err(DomainError::UnknownIntegerTag(other.to_string())),
        }
    }
}

impl fmt::Display for IntegerWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::U128 => "u128",
            Self::U256 => "u256",
        };
        f.write_str(tag)
    }
}

/// Accumulates little-endian base-256 digits into a U256.
///
/// Trailing zero bytes beyond the 32nd are tolerated; any other excess is an
/// overflow.
pub fn u256_from_le_bytes(bytes: &[u8]) -> Result<U256> {
    if bytes.len() > 32 {
        if bytes[32..].iter().any(|b| *b != 0) {
            return Err(DomainError::Overflow(32));
        }
        return Ok(U256::from_little_endian(&bytes[..32]));
    }
    Ok(U256::from_little_endian(bytes))
}

/// Encodes `value` as exactly `width.byte_len()` little-endian bytes.
pub fn u256_to_le_bytes(value: U256, width: IntegerWidth) -> Result<Vec<u8>> {
    if value > width.max_value() {
        return Err(DomainError::Overflow(width.byte_len()));
    }
    Ok((0..width.byte_len()).map(|i| value.byte(i)).collect())
}
