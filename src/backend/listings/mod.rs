//! Listings Module
//!
//! Product listings and favorites over HTTP.
//!
//! - **`access`** - ownership and role rules (`listing_access`, `listing_scope`)
//! - **`handlers`** - listing CRUD and search
//! - **`favorites`** - saved listings

pub mod access;
pub mod handlers;
pub mod favorites;

pub use access::{listing_access, listing_scope, Access, ListingScope};
