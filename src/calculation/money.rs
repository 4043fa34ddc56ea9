//! Money rounding.
//!
//! The pipeline carries exact decimals from start to finish. Rounding to
//! cents happens only when a figure leaves the engine, either through
//! [`round_money`] or through the serde helpers below.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};

use crate::error::{EngineError, EngineResult};

/// Number of decimal places in a displayed monetary amount.
pub const MONEY_DP: u32 = 2;

/// Rounds an amount to cents, midpoint away from zero.
///
/// # Examples
///
/// ```
/// use parcel_rate_engine::calculation::round_money;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_money(Decimal::from_str("25.694").unwrap()).to_string(), "25.69");
/// assert_eq!(round_money(Decimal::from_str("0.125").unwrap()).to_string(), "0.13");
/// assert_eq!(round_money(Decimal::from_str("8").unwrap()).to_string(), "8.00");
/// ```
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_DP);
    rounded
}

/// Serializes a decimal rounded to cents.
pub(crate) fn serialize<S: Serializer>(amount: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    Serialize::serialize(&round_money(*amount), serializer)
}

/// Returns `amount * pct / 100`.
///
/// # Errors
///
/// `AmountOverflow` naming `quantity` if the product leaves decimal range.
pub(crate) fn percentage(amount: Decimal, pct: Decimal, quantity: &str) -> EngineResult<Decimal> {
    amount
        .checked_mul(pct)
        .and_then(|product| product.checked_div(Decimal::ONE_HUNDRED))
        .ok_or_else(|| EngineError::overflow(quantity))
}

/// Returns `left + right`, or `AmountOverflow` naming `quantity`.
pub(crate) fn sum(left: Decimal, right: Decimal, quantity: &str) -> EngineResult<Decimal> {
    left.checked_add(right)
        .ok_or_else(|| EngineError::overflow(quantity))
}
