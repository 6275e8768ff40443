use crate::enums::PoolKind;
use crate::value_objects::Percentage;
use serde::{Deserialize, Serialize};

/// A farm pool as displayed in the pool list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmPool {
    /// `"SUI-TRUMP LP"` for pairs, the coin symbol otherwise.
    pub display_name: String,
    pub is_lp: bool,
    /// Canonical type string of the staked coin.
    pub type_string: String,
    /// Underlying symbols, native coin first for pairs.
    pub tokens: Vec<String>,
    pub allocation_points: u64,
    pub deposit_fee_bps: u32,
    pub withdrawal_fee_bps: u32,
    pub apr: Option<Percentage>,
    pub active: bool,
}

impl FarmPool {
    pub fn kind(&self) -> PoolKind {
        if self.is_lp {
            PoolKind::LiquidityPair
        } else {
            PoolKind::SingleToken
        }
    }

    pub fn deposit_fee(&self) -> Percentage {
        Percentage::from_bps(self.deposit_fee_bps)
    }

    pub fn withdrawal_fee(&self) -> Percentage {
        Percentage::from_bps(self.withdrawal_fee_bps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(is_lp: bool) -> FarmPool {
        FarmPool {
            display_name: "SUI-TRUMP LP".to_string(),
            is_lp,
            type_string: "0x1::pair::LPCoin".to_string(),
            tokens: vec!["SUI".to_string(), "TRUMP".to_string()],
            allocation_points: 100,
            deposit_fee_bps: 250,
            withdrawal_fee_bps: 50,
            apr: None,
            active: true,
        }
    }

    #[test]
    fn test_kind() {
        assert_eq!(pool(true).kind(), PoolKind::LiquidityPair);
        assert_eq!(pool(false).kind(), PoolKind::SingleToken);
        assert_eq!(pool(true).kind().to_string(), "LP");
    }

    #[test]
    fn test_fees() {
        let pool = pool(true);
        assert_eq!(pool.deposit_fee().to_string(), "2.50%");
        assert_eq!(pool.withdrawal_fee().to_bps(), 50);
    }
}
