//! Farm emission math.
//!
//! Rewards are minted per second and split between pools by allocation
//! points. Values enter as raw on-chain integers and leave as decimals only
//! for display-level ratios (APR), never for balances.

use crate::value_objects::Percentage;
use primitive_types::U256;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

pub const SECONDS_PER_YEAR: u64 = 365 * 24 * 60 * 60;

/// Basis-point denominator.
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Inputs for a pool APR estimate.
#[derive(Debug, Clone)]
pub struct EmissionInputs {
    /// Farm-wide reward emission, raw reward-coin units per second.
    pub reward_per_second: U256,
    pub reward_decimals: u8,
    /// Price of one reward coin in the quote currency.
    pub reward_price: Decimal,
    pub allocation_points: u64,
    pub total_allocation_points: u64,
    /// Value of everything staked in the pool, in the quote currency.
    pub staked_value: Decimal,
}

/// Fraction of emissions a pool receives.
pub fn pool_reward_share(allocation_points: u64, total_allocation_points: u64) -> Decimal {
    if total_allocation_points == 0 {
        return Decimal::ZERO;
    }
    Decimal::from(allocation_points) / Decimal::from(total_allocation_points)
}

/// Converts raw units to a decimal coin amount; `None` beyond Decimal range.
pub fn raw_to_decimal(raw: U256, decimals: u8) -> Option<Decimal> {
    if decimals > 28 || raw > U256::from(u128::MAX) {
        return None;
    }
    let whole = Decimal::from_u128(raw.as_u128())?;
    whole.checked_mul(Decimal::new(1, decimals as u32))
}

/// Yearly reward value of the pool over its staked value.
///
/// `None` when nothing is staked or the numbers leave Decimal range.
pub fn estimate_apr(inputs: &EmissionInputs) -> Option<Percentage> {
    if inputs.staked_value <= Decimal::ZERO {
        return None;
    }
    let per_second = raw_to_decimal(inputs.reward_per_second, inputs.reward_decimals)?;
    let share = pool_reward_share(inputs.allocation_points, inputs.total_allocation_points);
    let yearly_value = per_second
        .checked_mul(Decimal::from(SECONDS_PER_YEAR))?
        .checked_mul(share)?
        .checked_mul(inputs.reward_price)?;
    Some(Percentage(yearly_value.checked_div(inputs.staked_value)?))
}

/// Splits `amount` into `(net, fee)` for a fee in basis points.
///
/// Fees above 100% are clamped.
pub fn apply_fee(amount: U256, fee_bps: u32) -> (U256, U256) {
    let bps = fee_bps.min(BPS_DENOMINATOR);
    let fee = amount
        .checked_mul(U256::from(bps))
        .map(|v| v / U256::from(BPS_DENOMINATOR))
        // fall back to divide-first for amounts near U256::MAX
        .unwrap_or_else(|| amount / U256::from(BPS_DENOMINATOR) * U256::from(bps));
    (amount - fee, fee)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reward_share() {
        assert_eq!(pool_reward_share(25, 100), dec!(0.25));
        assert_eq!(pool_reward_share(10, 0), Decimal::ZERO);
    }

    #[test]
    fn test_estimate_apr() {
        // 1 reward coin/s (9 decimals), whole farm to this pool, price 1,
        // staked value equal to one year of emissions -> 100%
        let inputs = EmissionInputs {
            reward_per_second: U256::from(1_000_000_000u64),
            reward_decimals: 9,
            reward_price: Decimal::ONE,
            allocation_points: 100,
            total_allocation_points: 100,
            staked_value: Decimal::from(SECONDS_PER_YEAR),
        };
        assert_eq!(estimate_apr(&inputs).unwrap().0, Decimal::ONE);

        let half = EmissionInputs {
            allocation_points: 50,
            ..inputs.clone()
        };
        assert_eq!(estimate_apr(&half).unwrap().0, dec!(0.5));
    }

    #[test]
    fn test_apr_without_stake() {
        let inputs = EmissionInputs {
            reward_per_second: U256::from(1u64),
            reward_decimals: 9,
            reward_price: Decimal::ONE,
            allocation_points: 1,
            total_allocation_points: 1,
            staked_value: Decimal::ZERO,
        };
        assert!(estimate_apr(&inputs).is_none());
    }

    #[test]
    fn test_apply_fee() {
        let (net, fee) = apply_fee(U256::from(10_000u64), 250);
        assert_eq!(fee, U256::from(250u64));
        assert_eq!(net, U256::from(9_750u64));

        let (net, fee) = apply_fee(U256::from(100u64), 20_000);
        assert_eq!(fee, U256::from(100u64));
        assert!(net.is_zero());

        let (net, fee) = apply_fee(U256::MAX, 100);
        assert_eq!(net + fee, U256::MAX);
    }
}
