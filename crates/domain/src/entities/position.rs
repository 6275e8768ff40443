use crate::enums::LockPeriod;
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// Stake of the wallet in one farm pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingPosition {
    /// Position object id.
    pub id: String,
    /// Type string of the staked coin.
    pub pool_type: String,
    pub amount: U256,
    pub reward_debt: U256,
    pub pending_rewards: U256,
    pub staked_at_ms: u64,
}

/// Coins locked in the token locker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockPosition {
    /// Lock object id.
    pub id: String,
    pub coin_type: String,
    pub amount: U256,
    pub locked_at_ms: u64,
    pub unlock_at_ms: u64,
    pub lock_period: LockPeriod,
}

impl LockPosition {
    pub fn is_unlocked(&self, now_ms: u64) -> bool {
        now_ms >= self.unlock_at_ms
    }

    /// Milliseconds until the lock can be withdrawn; zero once unlocked.
    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        self.unlock_at_ms.saturating_sub(now_ms)
    }
}
