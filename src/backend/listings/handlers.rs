/**
 * Listing Handlers
 *
 * CRUD under `/api/product`. Every listing in a response carries its price
 * twice: as stored (`formatted_price`) and in the display currency picked by
 * the `currency` query parameter (`converted_price`). Without the parameter
 * a listing is shown in its own currency.
 */

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use tracing::info;
use uuid::Uuid;

use super::access::{listing_access, listing_scope, ListingScope};
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::pricing::PriceConverter;
use crate::backend::server::state::ListingState;
use crate::backend::store::{ListingOrdering, ListingQuery};
use crate::shared::listing::{
    CreateListingRequest, ListListingsResponse, ListingResponse, UpdateListingRequest,
};
use crate::shared::{Currency, Listing};

const DEFAULT_PAGE_SIZE: u32 = 10;
const MAX_PAGE_SIZE: u32 = 100;

/// `?currency=USD`
#[derive(Debug, Default, Deserialize)]
pub struct DisplayParams {
    pub currency: Option<String>,
}

impl DisplayParams {
    pub fn display_currency(&self) -> Result<Option<Currency>, BackendError> {
        parse_currency(self.currency.as_deref())
    }
}

/// Query string of a listing search
#[derive(Debug, Default, Deserialize)]
pub struct ListingParams {
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub category_id: Option<Uuid>,
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub currency: Option<String>,
}

/// Resolved page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u32,
    pub size: u32,
}

impl Page {
    fn offset(self) -> u64 {
        u64::from(self.number - 1) * u64::from(self.size)
    }
}

impl ListingParams {
    /// Page number from 1; size clamped to 1..=100
    pub fn page(&self) -> Result<Page, BackendError> {
        let number = self.page.unwrap_or(1);
        if number == 0 {
            return Err(BackendError::bad_request("page must be at least 1"));
        }
        let size = self
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        Ok(Page { number, size })
    }

    pub fn to_query(&self, page: Page) -> Result<ListingQuery, BackendError> {
        let ordering = match self.ordering.as_deref() {
            None | Some("") => ListingOrdering::default(),
            Some(raw) => ListingOrdering::parse(raw)
                .ok_or_else(|| BackendError::bad_request(format!("Unknown ordering: {}", raw)))?,
        };

        Ok(ListingQuery {
            min_price: self.min_price,
            max_price: self.max_price,
            category_id: self.category_id,
            search: self
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            seller_id: None,
            ordering,
            offset: page.offset(),
            limit: u64::from(page.size),
        })
    }
}

fn parse_currency(raw: Option<&str>) -> Result<Option<Currency>, BackendError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(code) => Ok(Some(Currency::from_str(code)?)),
    }
}

/// Listing plus both renderings of its price
pub async fn render(prices: &PriceConverter, listing: &Listing, display: Option<Currency>) -> ListingResponse {
    let quote = prices.convert(listing, display.unwrap_or(listing.currency)).await;
    ListingResponse::new(listing, &quote)
}

async fn render_page(
    prices: &PriceConverter,
    listings: &[Listing],
    display: Option<Currency>,
) -> Vec<ListingResponse> {
    let mut results = Vec::with_capacity(listings.len());
    for listing in listings {
        results.push(render(prices, listing, display).await);
    }
    results
}

/// GET /api/product/products
pub async fn list_products(
    State(state): State<ListingState>,
    Query(params): Query<ListingParams>,
) -> Result<Json<ListListingsResponse>, BackendError> {
    let display = parse_currency(params.currency.as_deref())?;
    let page = params.page()?;
    let query = params.to_query(page)?;

    let found = state.listings.search_listings(&query).await?;

    Ok(Json(ListListingsResponse {
        count: found.total,
        page: page.number,
        page_size: page.size,
        results: render_page(&state.prices, &found.listings, display).await,
    }))
}

/// GET /api/product/products/{id}
pub async fn get_product(
    State(state): State<ListingState>,
    Path(id): Path<Uuid>,
    Query(params): Query<DisplayParams>,
) -> Result<Json<ListingResponse>, BackendError> {
    let display = params.display_currency()?;
    let listing = state
        .listings
        .listing_by_id(id)
        .await?
        .ok_or_else(|| BackendError::not_found("Listing not found"))?;

    Ok(Json(render(&state.prices, &listing, display).await))
}

/// POST /api/product/products
pub async fn create_product(
    State(state): State<ListingState>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreateListingRequest>,
) -> Result<(StatusCode, Json<ListingResponse>), BackendError> {
    let listing = Listing::new(user.user_id, request)?;
    let listing = state.listings.insert_listing(listing).await?;

    info!(listing_id = %listing.id, owner = %user.user_id, price = %listing.price, "Listing created");

    Ok((StatusCode::CREATED, Json(render(&state.prices, &listing, None).await)))
}

/// PATCH /api/product/products/{id}
pub async fn update_product(
    State(state): State<ListingState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateListingRequest>,
) -> Result<Json<ListingResponse>, BackendError> {
    let mut listing = state
        .listings
        .listing_by_id(id)
        .await?
        .ok_or_else(|| BackendError::not_found("Listing not found"))?;

    if !listing_access(&user, &listing).can_edit() {
        return Err(BackendError::forbidden("Only the owner can edit this listing"));
    }

    listing.apply(request)?;
    state.listings.update_listing(&listing).await?;

    info!(listing_id = %listing.id, "Listing updated");

    Ok(Json(render(&state.prices, &listing, None).await))
}

/// DELETE /api/product/products/{id}
pub async fn delete_product(
    State(state): State<ListingState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, BackendError> {
    let listing = state
        .listings
        .listing_by_id(id)
        .await?
        .ok_or_else(|| BackendError::not_found("Listing not found"))?;

    if !listing_access(&user, &listing).can_delete() {
        return Err(BackendError::forbidden("Only the owner or an admin can delete this listing"));
    }

    state.listings.delete_listing(id).await?;
    info!(listing_id = %id, by = %user.user_id, "Listing deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/product/my-listings
pub async fn my_listings(
    State(state): State<ListingState>,
    AuthUser(user): AuthUser,
    Query(params): Query<ListingParams>,
) -> Result<Json<ListListingsResponse>, BackendError> {
    let display = parse_currency(params.currency.as_deref())?;
    let page = params.page()?;
    let mut query = params.to_query(page)?;

    let seller = match listing_scope(&user) {
        ListingScope::All => None,
        ListingScope::Seller(seller) => Some(seller),
        ListingScope::Nothing => {
            return Ok(Json(ListListingsResponse {
                count: 0,
                page: page.number,
                page_size: page.size,
                results: Vec::new(),
            }))
        }
    };
    query.seller_id = seller;

    let found = state.listings.search_listings(&query).await?;

    Ok(Json(ListListingsResponse {
        count: found.total,
        page: page.number,
        page_size: page.size,
        results: render_page(&state.prices, &found.listings, display).await,
    }))
}
