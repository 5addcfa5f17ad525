/**
 * Get Current User Handler
 *
 * GET /api/user/me. The auth middleware has already resolved the bearer
 * token; this reloads the profile so renamed users see current data.
 */

use axum::{extract::State, response::Json};

use crate::backend::auth::handlers::types::UserResponse;
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AuthState;

pub async fn get_me(
    State(auth): State<AuthState>,
    AuthUser(current): AuthUser,
) -> Result<Json<UserResponse>, BackendError> {
    let user = auth
        .users
        .user_by_id(current.user_id)
        .await?
        .ok_or_else(|| BackendError::unauthorized("User no longer exists"))?;

    Ok(Json(UserResponse::from(&user)))
}
