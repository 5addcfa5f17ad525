//! Shared Module
//!
//! This module contains types and data structures that are shared between
//! the server and its API clients. Everything here is plain data plus the
//! pure rules that go with it (rounding, participant derivation), so it
//! compiles without the `ssr` feature.

/// Supported currencies
pub mod currency;

/// Product listings and their API shapes
pub mod listing;

/// Shopping cart lines and totals
pub mod cart;

/// Price quotes and rounding rules
pub mod pricing;

/// Conversations and chat messages
pub mod messaging;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use currency::Currency;
pub use cart::CartItem;
pub use listing::{Favorite, Listing, ListingStatus};
pub use pricing::PriceQuote;
pub use error::SharedError;
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
