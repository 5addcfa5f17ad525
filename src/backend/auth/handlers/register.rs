/**
 * Register Handler
 *
 * POST /api/user/register
 *
 * # Validation
 *
 * - Email must contain '@' and is compared case-insensitively for uniqueness
 * - Password must be at least 8 characters long
 * - Role may be customer or vendor; admins are created out of band
 */

use axum::{extract::State, http::StatusCode, response::Json};
use tracing::{error, info, warn};

use crate::backend::auth::handlers::types::{AuthResponse, RegisterRequest, UserResponse};
use crate::backend::auth::users::{hash_password, Role, User};
use crate::backend::error::BackendError;
use crate::backend::server::state::AuthState;
use crate::backend::store::StoreError;

const MIN_PASSWORD_LEN: usize = 8;

/// Register handler
///
/// # Errors
///
/// * `400 Bad Request` - invalid email, short password, admin role, or email taken
/// * `500 Internal Server Error` - hashing, storage or token failure
pub async fn register(
    State(auth): State<AuthState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), BackendError> {
    let email = request.email.trim().to_string();
    info!("Register request for: {}", email);

    if !email.contains('@') {
        warn!("Invalid email format: {}", email);
        return Err(BackendError::bad_request("Invalid email format"));
    }

    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(BackendError::bad_request("Password must be at least 8 characters"));
    }

    let role = request.role.unwrap_or_default();
    if role == Role::Admin {
        warn!("Rejected admin self-registration for {}", email);
        return Err(BackendError::bad_request("Cannot register as admin"));
    }

    let password_hash = hash_password(&request.password, auth.password_cost).map_err(|e| {
        error!("Failed to hash password: {:?}", e);
        BackendError::handler(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
    })?;

    let user = auth
        .users
        .create_user(User::new(
            email,
            request.first_name.trim().to_string(),
            request.last_name.trim().to_string(),
            password_hash,
            role,
        ))
        .await
        .map_err(|e| match e {
            StoreError::Conflict(_) => BackendError::bad_request("Email already registered"),
            other => other.into(),
        })?;

    let token = auth.jwt.create_token(&user).map_err(|e| {
        error!("Failed to create token: {:?}", e);
        BackendError::handler(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
    })?;

    info!(user_id = %user.id, role = user.role.as_str(), "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: UserResponse::from(&user),
        }),
    ))
}
