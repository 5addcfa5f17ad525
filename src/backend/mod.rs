//! Backend Module
//!
//! All server-side code. Only compiled with the `ssr` feature.
//!
//! # Architecture
//!
//! - **`server`** - `AppState`, database loading, app creation
//! - **`routes`** - router assembly
//! - **`auth`** - users, passwords, JWT sessions
//! - **`middleware`** - bearer-token resolution
//! - **`listings`** - product CRUD and favorites
//! - **`cart`** - shopping cart priced in one display currency
//! - **`pricing`** - rate cache, exchange-rate gateway, price converter
//! - **`messaging`** - conversation registry, message ledger, chat handlers
//! - **`store`** - persistence traits with PostgreSQL and in-memory backends
//! - **`error`** - `BackendError` and its HTTP mapping
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - merkato-server binary
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── auth/           - Authentication
//! ├── middleware/     - Request middleware
//! ├── listings/       - Listings and favorites
//! ├── cart/           - Shopping cart
//! ├── pricing/        - Currency conversion
//! ├── messaging/      - Conversations and messages
//! ├── store/          - Persistence
//! └── error/          - Error types
//! ```
//!
//! # Request flow
//!
//! `TraceLayer` opens a span, `auth_middleware` resolves the bearer token
//! (if any), the handler extracts the sub-state it needs from `AppState`
//! and returns `Result<_, BackendError>`.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Backend error types
pub mod error;

/// Authentication and user management
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Persistence traits and implementations
pub mod store;

/// Exchange rates and price conversion
pub mod pricing;

/// Product listings and favorites
pub mod listings;

/// Shopping cart
pub mod cart;

/// Conversations and messages
pub mod messaging;

pub use error::BackendError;
pub use server::{create_app, create_app_with_state, AppState};
