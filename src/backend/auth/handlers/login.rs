/**
 * Login Handler
 *
 * POST /api/user/login
 *
 * An unknown email and a wrong password produce the same 401, so the
 * response never reveals which accounts exist.
 */

use axum::{extract::State, http::StatusCode, response::Json};
use tracing::{error, info, warn};

use crate::backend::auth::handlers::types::{AuthResponse, LoginRequest, UserResponse};
use crate::backend::auth::users::verify_password;
use crate::backend::error::BackendError;
use crate::backend::server::state::AuthState;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub async fn login(
    State(auth): State<AuthState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, BackendError> {
    let user = auth
        .users
        .user_by_email(request.email.trim())
        .await?
        .ok_or_else(|| {
            warn!("Login for unknown email: {}", request.email);
            BackendError::unauthorized(INVALID_CREDENTIALS)
        })?;

    // A hash bcrypt cannot parse counts as a mismatch
    let valid = verify_password(&request.password, &user.password_hash).unwrap_or_else(|e| {
        error!(user_id = %user.id, "Password verification error: {:?}", e);
        false
    });
    if !valid {
        warn!(user_id = %user.id, "Invalid password");
        return Err(BackendError::unauthorized(INVALID_CREDENTIALS));
    }

    let token = auth.jwt.create_token(&user).map_err(|e| {
        error!("Failed to create token: {:?}", e);
        BackendError::handler(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
    })?;

    info!(user_id = %user.id, "User logged in");

    Ok(Json(AuthResponse {
        token,
        user: UserResponse::from(&user),
    }))
}
