//! Cart Module
//!
//! The signed-in user's shopping cart under `/api/cart`. Lines are priced in
//! one display currency (`?currency=`, home currency by default) so the
//! cart total is a single sum.

pub mod handlers;

pub use handlers::{add_to_cart, remove_from_cart, view_cart};
