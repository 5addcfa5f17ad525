//! Property-based tests for price truncation and quotes

use merkato::shared::pricing::{truncate, PriceQuote, AMOUNT_SCALE, RATE_SCALE};
use merkato::shared::Currency;
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Prices up to 99,999,999.99 with two fractional digits
fn price() -> impl Strategy<Value = Decimal> {
    (0i64..=9_999_999_999).prop_map(|cents| Decimal::new(cents, 2))
}

/// Rates between 0.00001 and 1000 with five fractional digits
fn rate() -> impl Strategy<Value = Decimal> {
    (1i64..=100_000_000).prop_map(|units| Decimal::new(units, 5))
}

proptest! {
    #[test]
    fn test_truncate_never_rounds_up(units in any::<i64>(), scale in 0u32..10) {
        let value = Decimal::new(units, 10);
        let truncated = truncate(value, scale);
        let step = Decimal::new(1, scale);

        prop_assert_eq!(truncated.scale(), scale);
        prop_assert!(truncated.abs() <= value.abs());
        prop_assert!((value - truncated).abs() < step);
    }

    #[test]
    fn test_quote_amount_within_a_cent(amount in price(), rate in rate()) {
        let quote = PriceQuote::at_rate(amount, Currency::Etb, Currency::Usd, rate);
        let exact = amount * rate;

        prop_assert_eq!(quote.converted_amount.scale(), AMOUNT_SCALE);
        prop_assert!(quote.converted_amount <= exact);
        prop_assert!(exact - quote.converted_amount < Decimal::new(1, 2));
    }

    #[test]
    fn test_quote_rate_has_fixed_scale(amount in price(), rate in rate()) {
        let quote = PriceQuote::at_rate(amount, Currency::Etb, Currency::Aed, rate);
        prop_assert_eq!(quote.rate_used.scale(), RATE_SCALE);
        prop_assert!(quote.rate_used >= Decimal::ZERO);
    }

    #[test]
    fn test_unconverted_keeps_amount(amount in price()) {
        let quote = PriceQuote::unconverted(amount, Currency::Etb, Currency::Usd);
        prop_assert_eq!(quote.converted_amount, amount);
        prop_assert_eq!(quote.rate_used, Decimal::ONE);
        prop_assert!(!quote.is_converted());
    }
}
