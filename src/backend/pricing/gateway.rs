//! Exchange Rate Gateway
//!
//! Looks up the rate from the home currency to a display currency. The
//! provider is asked for its whole rate table in one GET:
//!
//! ```text
//! GET {base_url}/v6/{api_key}/latest/ETB
//! {"result": "success", "conversion_rates": {"ETB": 1, "USD": 0.0178, ...}}
//! ```
//!
//! Successful lookups are cached under `exchange_rate_{CODE}`. Every failure
//! (timeout, non-2xx, unexpected body, currency absent) is logged and
//! answered with a rate of 1, which callers read as "could not convert".

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, warn};

use super::cache::{rate_cache_key, RateCache};
use crate::shared::{AppConfig, Currency};

/// Source of home-to-target exchange rates
#[async_trait]
pub trait RateLookup: Send + Sync {
    /// Rate from the home currency to `target`. Never fails; 1 on any failure.
    async fn rate_for(&self, target: Currency) -> Decimal;
}

/// Why a live rate could not be obtained. Never leaves this module.
#[derive(Debug, Error)]
pub enum RateFetchError {
    #[error("no exchange rate API key configured")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned HTTP {0}")]
    Status(u16),

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("currency {0} missing from rate table")]
    MissingCurrency(Currency),
}

impl RateFetchError {
    /// Transport and status failures are errors; a bad table is a warning.
    fn log(&self, target: Currency) {
        match self {
            RateFetchError::Transport(_) | RateFetchError::Status(_) => {
                error!(currency = %target, error = %self, "Exchange rate fetch failed, using fallback rate");
            }
            RateFetchError::MissingApiKey
            | RateFetchError::MalformedPayload(_)
            | RateFetchError::MissingCurrency(_) => {
                warn!(currency = %target, error = %self, "Exchange rate unavailable, using fallback rate");
            }
        }
    }
}

/// Cached client for the exchange-rate provider
#[derive(Debug, Clone)]
pub struct ExchangeRateGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
    cache: Arc<dyn RateCache>,
    cache_ttl: Duration,
}

impl ExchangeRateGateway {
    pub fn new(config: &AppConfig, cache: Arc<dyn RateCache>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.rate_api_base_url.trim_end_matches('/').to_string(),
            api_key: config.rate_api_key.clone(),
            timeout: config.rate_timeout,
            cache,
            cache_ttl: config.rate_cache_ttl,
        }
    }

    /// Rate-table URL, or `None` without an API key
    pub fn endpoint(&self) -> Option<String> {
        let key = self.api_key.as_deref()?;
        Some(format!(
            "{}/v6/{}/latest/{}",
            self.base_url,
            key,
            Currency::home().code()
        ))
    }

    /// Rate from the home currency to `target`, cache first.
    pub async fn get_rate(&self, target: Currency) -> Decimal {
        if target.is_home() {
            return Decimal::ONE;
        }

        let key = rate_cache_key(target);
        if let Some(cached) = self.cache.get(&key).await {
            match Decimal::from_str(&cached) {
                Ok(rate) => {
                    info!(currency = %target, %rate, "Exchange rate served from cache");
                    return rate;
                }
                Err(_) => warn!(currency = %target, value = %cached, "Ignoring unparsable cached rate"),
            }
        }

        match self.fetch(target).await {
            Ok(rate) => {
                self.cache.set(&key, rate.to_string(), self.cache_ttl).await;
                info!(currency = %target, %rate, "Fetched live exchange rate");
                rate
            }
            Err(err) => {
                err.log(target);
                Decimal::ONE
            }
        }
    }

    async fn fetch(&self, target: Currency) -> Result<Decimal, RateFetchError> {
        let url = self.endpoint().ok_or(RateFetchError::MissingApiKey)?;

        let response = self.client.get(&url).timeout(self.timeout).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RateFetchError::Status(status.as_u16()));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| RateFetchError::MalformedPayload(e.to_string()))?;

        rate_from_payload(&payload, target)
    }
}

#[async_trait]
impl RateLookup for ExchangeRateGateway {
    async fn rate_for(&self, target: Currency) -> Decimal {
        self.get_rate(target).await
    }
}

/// Pick `target` out of a provider payload's `conversion_rates` table
pub fn rate_from_payload(payload: &Value, target: Currency) -> Result<Decimal, RateFetchError> {
    let rates = payload
        .get("conversion_rates")
        .and_then(Value::as_object)
        .ok_or_else(|| RateFetchError::MalformedPayload("no conversion_rates object".to_string()))?;

    let raw = rates
        .get(target.code())
        .ok_or(RateFetchError::MissingCurrency(target))?;

    // Go through the textual form so 0.0178 stays exactly 0.0178
    let parsed = match raw {
        Value::Number(n) => Decimal::from_str(&n.to_string()).or_else(|_| Decimal::from_scientific(&n.to_string())),
        Value::String(s) => Decimal::from_str(s.trim()),
        other => {
            return Err(RateFetchError::MalformedPayload(format!(
                "rate for {} is not a number: {}",
                target, other
            )))
        }
    };

    match parsed {
        Ok(rate) if rate > Decimal::ZERO => Ok(rate),
        Ok(rate) => Err(RateFetchError::MalformedPayload(format!(
            "non-positive rate {} for {}",
            rate, target
        ))),
        Err(e) => Err(RateFetchError::MalformedPayload(e.to_string())),
    }
}
