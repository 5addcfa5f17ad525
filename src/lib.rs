//! Merkato - Marketplace Backend Library
//!
//! Merkato is the server behind a classifieds marketplace: sellers list
//! products, buyers browse them in the currency of their choice, keep
//! favorites, and talk to sellers in one-to-one conversations.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared between the server and its clients
//!   - Currencies, listings and price presentation
//!   - Conversations and chat messages
//!   - Configuration and error types
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Axum HTTP server and routes
//!   - Exchange-rate gateway and price conversion
//!   - Conversation registry and message ledger
//!   - Authentication, persistence (PostgreSQL or in-memory)
//!
//! # Feature Flags
//!
//! - **`ssr`** - Server-side code (on by default)
//!   - Includes Axum server, database stores, rate provider client
//!
//! # Usage
//!
//! ```rust,no_run
//! use merkato::backend::server::init::create_app;
//! use merkato::shared::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::from_env()?;
//! let app = create_app(config).await;
//! // Serve `app` with axum::serve
//! # Ok(())
//! # }
//! ```
//!
//! # Pricing
//!
//! Listing prices are stored in the home currency (ETB) or one of the other
//! supported codes. Reads may ask for a different display currency; the
//! price converter consults a cached exchange-rate gateway and never fails
//! the request because the rate provider is down.

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
