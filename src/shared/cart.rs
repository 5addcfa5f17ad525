//! Shopping Cart
//!
//! One line per (user, listing). Adding a listing that is already in the
//! cart adds to that line's quantity instead of creating a second line.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::currency::Currency;
use super::error::SharedError;
use super::listing::ListingResponse;

/// Largest quantity a single cart line may hold
pub const MAX_LINE_QUANTITY: u32 = 1000;

/// A listing in a user's cart
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartItem {
    pub user_id: Uuid,
    pub listing_id: Uuid,
    pub quantity: u32,
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    pub fn new(user_id: Uuid, listing_id: Uuid, quantity: u32) -> Result<Self, SharedError> {
        Ok(Self {
            user_id,
            listing_id,
            quantity: validate_quantity(quantity)?,
            added_at: Utc::now(),
        })
    }
}

pub fn validate_quantity(quantity: u32) -> Result<u32, SharedError> {
    if quantity == 0 {
        return Err(SharedError::validation("quantity", "Quantity must be at least 1"));
    }
    if quantity > MAX_LINE_QUANTITY {
        return Err(SharedError::validation(
            "quantity",
            format!("Quantity cannot exceed {}", MAX_LINE_QUANTITY),
        ));
    }
    Ok(quantity)
}

/// Unit price times quantity, saturating at `Decimal::MAX`
pub fn line_total(unit_price: Decimal, quantity: u32) -> Decimal {
    unit_price.saturating_mul(Decimal::from(quantity))
}

fn default_quantity() -> u32 {
    1
}

/// Request body for adding a listing to the cart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddToCartRequest {
    pub listing_id: Uuid,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

/// A cart line with its listing and line total in the display currency
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemResponse {
    pub listing_id: Uuid,
    pub quantity: u32,
    pub listing: ListingResponse,
    pub total_price: Decimal,
}

/// The whole cart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartResponse {
    pub cart_items: Vec<CartItemResponse>,
    pub total_price: Decimal,
    pub currency: Currency,
}
