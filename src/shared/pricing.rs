//! Price Quotes
//!
//! A quote is the presentation of one stored price in a display currency.
//! The arithmetic lives here so that clients and the server agree on it:
//! converted amounts are truncated toward zero at 2 decimal places and the
//! reported rate is the effective `converted / original`, truncated toward
//! zero at 5 decimal places.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::currency::Currency;

/// Decimal places kept on a converted amount
pub const AMOUNT_SCALE: u32 = 2;

/// Decimal places kept on a reported rate
pub const RATE_SCALE: u32 = 5;

/// Result of presenting a price in a display currency
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceQuote {
    pub original_amount: Decimal,
    pub original_currency: Currency,
    pub converted_amount: Decimal,
    pub target_currency: Currency,
    pub rate_used: Decimal,
}

impl PriceQuote {
    /// Quote that leaves the amount untouched
    pub fn unconverted(amount: Decimal, currency: Currency, target: Currency) -> Self {
        Self {
            original_amount: amount,
            original_currency: currency,
            converted_amount: truncate(amount, AMOUNT_SCALE),
            target_currency: target,
            rate_used: truncate(Decimal::ONE, RATE_SCALE),
        }
    }

    /// Quote that multiplies the amount by `rate`.
    ///
    /// A product or effective rate that does not fit in a `Decimal` leaves
    /// the amount unconverted.
    pub fn at_rate(amount: Decimal, currency: Currency, target: Currency, rate: Decimal) -> Self {
        let Some(converted) = amount.checked_mul(rate).map(|c| truncate(c, AMOUNT_SCALE)) else {
            return Self::unconverted(amount, currency, target);
        };
        let Some(rate_used) = effective_rate(amount, converted) else {
            return Self::unconverted(amount, currency, target);
        };
        Self {
            original_amount: amount,
            original_currency: currency,
            converted_amount: converted,
            target_currency: target,
            rate_used,
        }
    }

    /// Whether the amount was actually changed by the conversion
    pub fn is_converted(&self) -> bool {
        self.converted_amount != self.original_amount
    }
}

/// A rate of exactly 1 for a non-home currency is how the gateway reports
/// that it could not obtain a live rate.
pub fn is_fallback_rate(rate: Decimal, target: Currency) -> bool {
    rate == Decimal::ONE && !target.is_home()
}

/// `converted / original` truncated to [`RATE_SCALE`], or 1 for a zero
/// original. `None` if the quotient overflows.
pub fn effective_rate(original: Decimal, converted: Decimal) -> Option<Decimal> {
    if original.is_zero() {
        return Some(truncate(Decimal::ONE, RATE_SCALE));
    }
    converted
        .checked_div(original)
        .map(|rate| truncate(rate, RATE_SCALE))
}

/// Truncate toward zero at `scale` places and pad to exactly that scale
pub fn truncate(value: Decimal, scale: u32) -> Decimal {
    let mut truncated = value.round_dp_with_strategy(scale, RoundingStrategy::ToZero);
    truncated.rescale(scale);
    truncated
}
