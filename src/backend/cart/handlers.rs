/**
 * Cart Handlers
 *
 * - `GET /api/cart` - lines with per-line and overall totals
 * - `POST /api/cart` - add a listing, merging into an existing line
 * - `DELETE /api/cart/{listing_id}` - drop a line
 *
 * Each line's total is the listing's converted price times its quantity.
 * When no live rate is available the converted price is the stored one,
 * exactly as on the listing pages.
 */

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use rust_decimal::Decimal;
use tracing::{debug, info};
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::listings::handlers::{render, DisplayParams};
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::CartState;
use crate::backend::store::StoreError;
use crate::shared::cart::{line_total, AddToCartRequest, CartItemResponse, CartResponse};
use crate::shared::{CartItem, Currency, Listing};

async fn price_line(state: &CartState, item: &CartItem, listing: &Listing, display: Currency) -> CartItemResponse {
    let listing = render(&state.prices, listing, Some(display)).await;
    CartItemResponse {
        listing_id: item.listing_id,
        quantity: item.quantity,
        total_price: line_total(listing.converted_price.amount, item.quantity),
        listing,
    }
}

/// GET /api/cart
pub async fn view_cart(
    State(state): State<CartState>,
    AuthUser(user): AuthUser,
    Query(params): Query<DisplayParams>,
) -> Result<Json<CartResponse>, BackendError> {
    let display = params.display_currency()?.unwrap_or_default();
    let items = state.carts.cart_for(user.user_id).await?;

    let mut cart_items = Vec::with_capacity(items.len());
    let mut total_price = Decimal::ZERO;
    for item in &items {
        let Some(listing) = state.listings.listing_by_id(item.listing_id).await? else {
            debug!(listing_id = %item.listing_id, "Skipping cart line of a removed listing");
            continue;
        };
        let line = price_line(&state, item, &listing, display).await;
        total_price = total_price.saturating_add(line.total_price);
        cart_items.push(line);
    }

    Ok(Json(CartResponse {
        cart_items,
        total_price,
        currency: display,
    }))
}

/// POST /api/cart
pub async fn add_to_cart(
    State(state): State<CartState>,
    AuthUser(user): AuthUser,
    Query(params): Query<DisplayParams>,
    Json(request): Json<AddToCartRequest>,
) -> Result<(StatusCode, Json<CartItemResponse>), BackendError> {
    let display = params.display_currency()?.unwrap_or_default();
    let item = CartItem::new(user.user_id, request.listing_id, request.quantity)?;

    let listing = state
        .listings
        .listing_by_id(request.listing_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Product not found"))?;

    let stored = state.carts.add_to_cart(item).await.map_err(|e| match e {
        StoreError::Conflict(_) => BackendError::bad_request("Cart line quantity limit reached"),
        other => other.into(),
    })?;

    info!(
        user_id = %user.user_id,
        listing_id = %listing.id,
        quantity = stored.quantity,
        "Added to cart"
    );

    Ok((StatusCode::CREATED, Json(price_line(&state, &stored, &listing, display).await)))
}

/// DELETE /api/cart/{listing_id}
pub async fn remove_from_cart(
    State(state): State<CartState>,
    AuthUser(user): AuthUser,
    Path(listing_id): Path<Uuid>,
) -> Result<StatusCode, BackendError> {
    if !state.carts.remove_from_cart(user.user_id, listing_id).await? {
        return Err(BackendError::not_found("Product not found in cart"));
    }
    info!(user_id = %user.user_id, listing_id = %listing_id, "Removed from cart");
    Ok(StatusCode::NO_CONTENT)
}
