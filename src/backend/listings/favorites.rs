/**
 * Favorite Handlers
 *
 * A user's saved listings under `/api/product/favorites`. Saving the same
 * listing twice, or a listing that does not exist, is a validation error.
 */

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use tracing::{debug, info};
use uuid::Uuid;

use super::handlers::{render, DisplayParams};
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::ListingState;
use crate::backend::store::StoreError;
use crate::shared::listing::{AddFavoriteRequest, FavoriteResponse, ListFavoritesResponse};
use crate::shared::Favorite;

/// GET /api/product/favorites, newest first
pub async fn list_favorites(
    State(state): State<ListingState>,
    AuthUser(user): AuthUser,
    Query(params): Query<DisplayParams>,
) -> Result<Json<ListFavoritesResponse>, BackendError> {
    let display = params.display_currency()?;
    let favorites = state.favorites.favorites_for(user.user_id).await?;

    let mut out = Vec::with_capacity(favorites.len());
    for favorite in favorites {
        let Some(listing) = state.listings.listing_by_id(favorite.listing_id).await? else {
            debug!(listing_id = %favorite.listing_id, "Skipping favorite of a removed listing");
            continue;
        };
        out.push(FavoriteResponse {
            listing_id: favorite.listing_id,
            created_at: favorite.created_at,
            listing: render(&state.prices, &listing, display).await,
        });
    }

    Ok(Json(ListFavoritesResponse { favorites: out }))
}

/// POST /api/product/favorites
pub async fn add_favorite(
    State(state): State<ListingState>,
    AuthUser(user): AuthUser,
    Json(request): Json<AddFavoriteRequest>,
) -> Result<(StatusCode, Json<FavoriteResponse>), BackendError> {
    let listing = state
        .listings
        .listing_by_id(request.listing_id)
        .await?
        .ok_or_else(|| BackendError::bad_request("Listing does not exist"))?;

    let favorite = state
        .favorites
        .add_favorite(Favorite::new(user.user_id, listing.id))
        .await
        .map_err(|e| match e {
            StoreError::Conflict(_) => BackendError::bad_request("Listing is already in favorites"),
            other => other.into(),
        })?;

    info!(user_id = %user.user_id, listing_id = %listing.id, "Favorite added");

    Ok((
        StatusCode::CREATED,
        Json(FavoriteResponse {
            listing_id: favorite.listing_id,
            created_at: favorite.created_at,
            listing: render(&state.prices, &listing, None).await,
        }),
    ))
}

/// DELETE /api/product/favorites/{listing_id}
pub async fn remove_favorite(
    State(state): State<ListingState>,
    AuthUser(user): AuthUser,
    Path(listing_id): Path<Uuid>,
) -> Result<StatusCode, BackendError> {
    if !state.favorites.remove_favorite(user.user_id, listing_id).await? {
        return Err(BackendError::not_found("Favorite not found"));
    }
    info!(user_id = %user.user_id, listing_id = %listing_id, "Favorite removed");
    Ok(StatusCode::NO_CONTENT)
}
