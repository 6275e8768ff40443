use serde::{Deserialize, Serialize};
use std::fmt;

const DAY_MS: u64 = 24 * 60 * 60 * 1000;

/// Kind of asset a farm pool accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolKind {
    /// A single coin is staked.
    SingleToken,
    /// An LP coin of a trading pair is staked.
    LiquidityPair,
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingleToken => f.write_str("Single"),
            Self::LiquidityPair => f.write_str("LP"),
        }
    }
}

/// Lock duration offered by the token locker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LockPeriod {
    OneWeek,
    ThreeMonths,
    SixMonths,
    OneYear,
    /// Any other duration, in whole days.
    Custom(u64),
}

impl LockPeriod {
    pub fn days(&self) -> u64 {
        match self {
            Self::OneWeek => 7,
            Self::ThreeMonths => 90,
            Self::SixMonths => 180,
            Self::OneYear => 365,
            Self::Custom(days) => *days,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.days().saturating_mul(DAY_MS)
    }

    /// Maps a lock duration back to a known period.
    pub fn from_duration_ms(ms: u64) -> Self {
        match ms / DAY_MS {
            7 => Self::OneWeek,
            90 => Self::ThreeMonths,
            180 => Self::SixMonths,
            365 => Self::OneYear,
            days => Self::Custom(days),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::OneWeek => "1 week".to_string(),
            Self::ThreeMonths => "3 months".to_string(),
            Self::SixMonths => "6 months".to_string(),
            Self::OneYear => "1 year".to_string(),
            Self::Custom(days) => format!("{} days", days),
        }
    }
}
