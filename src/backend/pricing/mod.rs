//! Pricing Module
//!
//! Presents stored listing prices in a reader's display currency.
//!
//! # Architecture
//!
//! - **`cache`** - `RateCache` trait and the in-process TTL cache
//! - **`gateway`** - `ExchangeRateGateway`, the cached client for the rate provider
//! - **`converter`** - `PriceConverter`, which turns a listing into a `PriceQuote`
//!
//! # Failure policy
//!
//! Nothing in this module returns an error to a request handler. A rate
//! provider that is slow, down, or returns garbage degrades the quote to
//! "unconverted" and is logged; the listing is still served.

pub mod cache;

pub mod gateway;

pub mod converter;

pub use cache::{rate_cache_key, MemoryRateCache, RateCache};
pub use converter::PriceConverter;
pub use gateway::{ExchangeRateGateway, RateFetchError, RateLookup};
