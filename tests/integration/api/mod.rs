//! HTTP API integration tests, driven through `axum_test::TestServer`
//! over in-memory stores.

pub mod auth_test;
pub mod cart_test;
pub mod chat_test;
pub mod favorites_test;
pub mod listings_test;
