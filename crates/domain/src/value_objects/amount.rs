use crate::error::Result;
use crate::format::{format_amount, parse_amount};
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw on-chain units together with the coin's decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Amount {
    pub raw: U256,
    pub decimals: u8,
}

impl Amount {
    pub fn new(raw: impl Into<U256>, decimals: u8) -> Self {
        Self {
            raw: raw.into(),
            decimals,
        }
    }

    pub fn zero(decimals: u8) -> Self {
        Self::new(U256::zero(), decimals)
    }

    /// Parses a user-entered amount such as `"12.5"`.
    pub fn from_display(display: &str, decimals: u8) -> Result<Self> {
        Ok(Self::new(parse_amount(display, decimals)?, decimals))
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    /// Rendered with at most `places` fractional digits.
    pub fn to_display(&self, places: Option<u8>) -> Result<String> {
        format_amount(self.raw, self.decimals, places)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_display(None) {
            Ok(s) => f.write_str(&s),
            Err(_) => write!(f, "{}", self.raw),
        }
    }
}
