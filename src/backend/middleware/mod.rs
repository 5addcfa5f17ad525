//! Middleware Module
//!
//! - **`auth`** - resolves bearer tokens into an `AuthenticatedUser`

pub mod auth;

pub use auth::{auth_middleware, extract_authenticated_user, AuthUser, AuthenticatedUser};
