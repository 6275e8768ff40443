//! Display formatting for on-chain amounts.
//!
//! Amounts stay in integer space (U256) from parse to render; floats never
//! touch a balance.

use crate::error::{DomainError, Result};
use primitive_types::U256;
use rust_decimal::{Decimal, RoundingStrategy};

/// Largest decimals count whose power of ten fits in a U256.
const MAX_DECIMALS: u8 = 77;

fn pow10(decimals: u8) -> Result<U256> {
    if decimals > MAX_DECIMALS {
        return Err(DomainError::InvalidAmount(format!(
            "unsupported decimals {}",
            decimals
        )));
    }
    Ok(U256::exp10(decimals as usize))
}

/// Inserts `,` between groups of three integer digits.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Renders `value` scaled down by `decimals`.
///
/// The fractional part is truncated to `max_fraction_digits` when given, and
/// trailing zeros are always trimmed.
pub fn format_amount(value: U256, decimals: u8, max_fraction_digits: Option<u8>) -> Result<String> {
    let scale = pow10(decimals)?;
    let whole = value / scale;
    let frac = value % scale;

    let mut out = group_thousands(&whole.to_string());
    if decimals == 0 || frac.is_zero() {
        return Ok(out);
    }

    let mut frac_digits = format!("{:0>width$}", frac.to_string(), width = decimals as usize);
    if let Some(max) = max_fraction_digits {
        frac_digits.truncate(max as usize);
    }
    let trimmed = frac_digits.trim_end_matches('0');
    if !trimmed.is_empty() {
        out.push('.');
        out.push_str(trimmed);
    }
    Ok(out)
}

/// Formats a raw integer amount string with the token's decimals.
///
/// `format_balance("1500000000", 9)` yields `"1.5"`.
pub fn format_balance(amount: &str, decimals: u8) -> Result<String> {
    let amount = amount.trim();
    if amount.is_empty() || !amount.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DomainError::InvalidAmount(amount.to_string()));
    }
    let value = U256::from_dec_str(amount).map_err(|_| DomainError::InvalidAmount(amount.to_string()))?;
    format_amount(value, decimals, None)
}

/// Parses a user-entered decimal string into raw token units.
pub fn parse_amount(display: &str, decimals: u8) -> Result<U256> {
    let cleaned: String = display.trim().chars().filter(|c| *c != ',').collect();
    let (whole, frac) = match cleaned.split_once('.') {
        Some((w, f)) => (w, f),
        None => (cleaned.as_str(), ""),
    };

    let valid = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && frac.is_empty()) || !valid(whole) || !valid(frac) {
        return Err(DomainError::InvalidAmount(display.to_string()));
    }
    if frac.len() > decimals as usize {
        return Err(DomainError::TooManyDecimals {
            got: frac.len(),
            max: decimals,
        });
    }

    let scale = pow10(decimals)?;
    let parse = |s: &str| -> Result<U256> {
        if s.is_empty() {
            return Ok(U256::zero());
        }
        U256::from_dec_str(s).map_err(|_| DomainError::InvalidAmount(display.to_string()))
    };

    let whole_units = parse(whole)?
        .checked_mul(scale)
        .ok_or(DomainError::Overflow(32))?;
    let frac_padded = format!("{:0<width$}", frac, width = decimals as usize);
    whole_units
        .checked_add(parse(&frac_padded)?)
        .ok_or(DomainError::Overflow(32))
}

/// Formats a decimal fraction (0.025 = 2.5%) as a percent string.
pub fn format_percentage(fraction: Decimal, places: u32) -> String {
    let pct = (fraction * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}%", places as usize, pct)
}

/// Formats basis points as a percent string: `250` -> `"2.50%"`.
pub fn format_bps(bps: u32, places: u32) -> String {
    format_percentage(Decimal::from(bps) / Decimal::from(10_000), places)
}

/// Shortens a long hex address for display: `0x1234...abcd`.
pub fn shorten_address(address: &str, keep: usize) -> String {
    let body = address.strip_prefix("0x").unwrap_or(address);
    let chars: Vec<char> = body.chars().collect();
    if chars.len() <= keep * 2 {
        return address.to_string();
    }
    let head: String = chars[..keep].iter().collect();
    let tail: String = chars[chars.len() - keep..].iter().collect();
    format!("0x{}...{}", head, tail)
}
