use crate::value_objects::Amount;
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// A coin held by the connected wallet, with its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenInfo {
    /// Metadata object id, when the chain has one.
    pub id: Option<String>,
    pub symbol: String,
    pub name: String,
    /// Fully qualified coin type.
    pub coin_type: String,
    pub decimals: u8,
    pub balance: U256,
}

impl TokenInfo {
    pub fn new(
        coin_type: impl Into<String>,
        symbol: impl Into<String>,
        name: impl Into<String>,
        decimals: u8,
    ) -> Self {
        Self {
            id: None,
            symbol: symbol.into(),
            name: name.into(),
            coin_type: coin_type.into(),
            decimals,
            balance: U256::zero(),
        }
    }

    #[must_use]
    pub fn with_balance(mut self, balance: U256) -> Self {
        self.balance = balance;
        self
    }

    pub fn amount(&self) -> Amount {
        Amount::new(self.balance, self.decimals)
    }
}
