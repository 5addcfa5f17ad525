//! Price Converter
//!
//! Turns a listing's stored price into a [`PriceQuote`] for a display
//! currency. One rate is looked up, for the display currency, and the
//! stored amount is multiplied by it.
//!
//! A lookup that comes back as exactly 1 for a non-home currency is the
//! gateway's fallback signal. The quote is then left unconverted instead of
//! presenting a misleading 1:1 figure, even though a genuine parity rate
//! would look the same.

use std::sync::Arc;
use tracing::warn;

use super::gateway::RateLookup;
use crate::shared::pricing::{is_fallback_rate, PriceQuote};
use crate::shared::{Currency, Listing};

#[derive(Clone)]
pub struct PriceConverter {
    rates: Arc<dyn RateLookup>,
}

impl PriceConverter {
    pub fn new(rates: Arc<dyn RateLookup>) -> Self {
        Self { rates }
    }

    /// Quote `listing` in `target`.
    pub async fn convert(&self, listing: &Listing, target: Currency) -> PriceQuote {
        let (amount, source) = (listing.price, listing.currency);

        if target == source || amount.is_zero() {
            return PriceQuote::unconverted(amount, source, target);
        }

        let rate = self.rates.rate_for(target).await;
        if is_fallback_rate(rate, target) {
            warn!(currency = %target, "No live exchange rate, showing the original price");
            return PriceQuote::unconverted(amount, source, target);
        }

        PriceQuote::at_rate(amount, source, target, rate)
    }
}
