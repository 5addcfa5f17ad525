//! Listing Data Structures
//!
//! A listing is a product offered by a seller. Prices are fixed-point with
//! two fractional digits and are stored in one of the supported currencies.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::currency::Currency;
use super::error::SharedError;
use super::pricing::PriceQuote;

/// Largest storable price: ten digits with two after the point (99,999,999.99)
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// Longest accepted title
pub const MAX_TITLE_LEN: usize = 255;

/// Lifecycle state of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    #[default]
    Active,
    Sold,
    Expired,
}

impl ListingStatus {
    /// Convert to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Active => "active",
            ListingStatus::Sold => "sold",
            ListingStatus::Expired => "expired",
        }
    }

    /// Parse from string (database)
    pub fn from_db(s: &str) -> Self {
        match s {
            "sold" => ListingStatus::Sold,
            "expired" => ListingStatus::Expired,
            _ => ListingStatus::Active,
        }
    }
}

/// A product listing as persisted
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Stored price, scale 2, never negative
    pub price: Decimal,
    pub currency: Currency,
    pub category_id: Option<Uuid>,
    pub city_id: Option<Uuid>,
    /// Seller shown to buyers; equal to the owner at creation
    pub seller_id: Option<Uuid>,
    /// The only user allowed to modify the listing
    pub owner_id: Uuid,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
}

impl Listing {
    /// Build a new active listing owned and sold by `owner_id`
    pub fn new(owner_id: Uuid, draft: CreateListingRequest) -> Result<Self, SharedError> {
        let title = validate_title(&draft.title)?;
        let price = validate_price(draft.price)?;

        Ok(Self {
            id: Uuid::new_v4(),
            title,
            description: draft.description,
            price,
            currency: draft.currency.unwrap_or_default(),
            category_id: draft.category_id,
            city_id: draft.city_id,
            seller_id: Some(owner_id),
            owner_id,
            status: ListingStatus::Active,
            created_at: Utc::now(),
        })
    }

    /// Apply a partial update, validating every field that changes
    pub fn apply(&mut self, update: UpdateListingRequest) -> Result<(), SharedError> {
        if let Some(title) = update.title {
            self.title = validate_title(&title)?;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(price) = update.price {
            self.price = validate_price(price)?;
        }
        if let Some(currency) = update.currency {
            self.currency = currency;
        }
        if let Some(category_id) = update.category_id {
            self.category_id = Some(category_id);
        }
        if let Some(city_id) = update.city_id {
            self.city_id = Some(city_id);
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        Ok(())
    }

    /// The stored price in its own currency, for display
    pub fn formatted_price(&self) -> FormattedPrice {
        FormattedPrice {
            amount: self.price,
            currency: self.currency,
            formatted: format!("{:.2} {}", self.price, self.currency),
        }
    }
}

fn validate_title(title: &str) -> Result<String, SharedError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(SharedError::validation("title", "Title cannot be empty"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(SharedError::validation(
            "title",
            format!("Title cannot exceed {} characters", MAX_TITLE_LEN),
        ));
    }
    Ok(title.to_string())
}

/// Check a price against the storage rules and normalise it to scale 2
pub fn validate_price(price: Decimal) -> Result<Decimal, SharedError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(SharedError::validation("price", "Price cannot be negative"));
    }
    if price.normalize().scale() > 2 {
        return Err(SharedError::validation(
            "price",
            "Price cannot have more than 2 decimal places",
        ));
    }
    if price > MAX_PRICE {
        return Err(SharedError::validation("price", "Price is too large"));
    }
    let mut normalised = price.abs();
    normalised.rescale(2);
    Ok(normalised)
}

/// Request body for creating a listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateListingRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    /// Defaults to the home currency
    #[serde(default)]
    pub currency: Option<Currency>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub city_id: Option<Uuid>,
}

/// Request body for a partial listing update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateListingRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub currency: Option<Currency>,
    pub category_id: Option<Uuid>,
    pub city_id: Option<Uuid>,
    pub status: Option<ListingStatus>,
}

/// Original price breakdown, e.g. "999.99 ETB"
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormattedPrice {
    pub amount: Decimal,
    pub currency: Currency,
    pub formatted: String,
}

/// Price shown in the requested display currency
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConvertedPrice {
    pub amount: Decimal,
    pub currency: Currency,
    pub exchange_rate: Decimal,
}

impl From<&PriceQuote> for ConvertedPrice {
    fn from(quote: &PriceQuote) -> Self {
        Self {
            amount: quote.converted_amount,
            currency: quote.target_currency,
            exchange_rate: quote.rate_used,
        }
    }
}

/// A listing as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListingResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub currency: Currency,
    pub formatted_price: FormattedPrice,
    pub converted_price: ConvertedPrice,
    pub category_id: Option<Uuid>,
    pub city_id: Option<Uuid>,
    pub seller_id: Option<Uuid>,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
}

impl ListingResponse {
    pub fn new(listing: &Listing, quote: &PriceQuote) -> Self {
        Self {
            id: listing.id,
            title: listing.title.clone(),
            description: listing.description.clone(),
            price: listing.price,
            currency: listing.currency,
            formatted_price: listing.formatted_price(),
            converted_price: quote.into(),
            category_id: listing.category_id,
            city_id: listing.city_id,
            seller_id: listing.seller_id,
            status: listing.status,
            created_at: listing.created_at,
        }
    }
}

/// One page of listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListListingsResponse {
    pub count: u64,
    pub page: u32,
    pub page_size: u32,
    pub results: Vec<ListingResponse>,
}

/// A listing a user has saved; at most one per (user, listing)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Favorite {
    pub user_id: Uuid,
    pub listing_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Favorite {
    pub fn new(user_id: Uuid, listing_id: Uuid) -> Self {
        Self {
            user_id,
            listing_id,
            created_at: Utc::now(),
        }
    }
}

/// Request body for saving a favorite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddFavoriteRequest {
    pub listing_id: Uuid,
}

/// A favorite with the listing it points at
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteResponse {
    pub listing_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub listing: ListingResponse,
}

/// Response for listing favorites
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListFavoritesResponse {
    pub favorites: Vec<FavoriteResponse>,
}
