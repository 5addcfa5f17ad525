/**
 * Authentication Middleware
 *
 * Applied to the whole router. It never decides whether a route needs a
 * user; it only resolves one:
 *
 * - no `Authorization` header: the request continues anonymously
 * - a valid bearer token for an existing user: `AuthenticatedUser` is
 *   attached to the request extensions
 * - anything else (malformed header, bad or expired token, deleted user):
 *   401 straight away
 *
 * Handlers that need a user take the `AuthUser` extractor, which rejects
 * anonymous requests with 401.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::backend::auth::users::Role;
use crate::backend::error::BackendError;
use crate::backend::server::state::AuthState;

/// Authenticated user data extracted from JWT token
#[derive(Clone, Debug, PartialEq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

pub async fn auth_middleware(State(auth): State<AuthState>, mut request: Request, next: Next) -> Response {
    let Some(header) = request.headers().get(AUTHORIZATION) else {
        return next.run(request).await;
    };

    match authenticate(&auth, header.to_str().ok()).await {
        Ok(user) => {
            debug!(user_id = %user.user_id, "Request authenticated");
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(err) => err.into_response(),
    }
}

async fn authenticate(auth: &AuthState, header: Option<&str>) -> Result<AuthenticatedUser, BackendError> {
    let token = header
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            warn!("Invalid Authorization header format");
            BackendError::unauthorized("Invalid Authorization header")
        })?;

    let claims = auth.jwt.verify_token(token).map_err(|e| {
        warn!("Invalid token: {:?}", e);
        BackendError::unauthorized("Invalid or expired token")
    })?;

    let user_id = claims.user_id().map_err(|e| {
        warn!("Invalid user ID in token: {:?}", e);
        BackendError::unauthorized("Invalid or expired token")
    })?;

    // Role comes from the stored user, not the token, so a demotion takes
    // effect immediately
    let user = auth.users.user_by_id(user_id).await?.ok_or_else(|| {
        warn!(user_id = %user_id, "Token for unknown user");
        BackendError::unauthorized("Invalid or expired token")
    })?;

    Ok(AuthenticatedUser {
        user_id: user.id,
        email: user.email,
        role: user.role,
    })
}

/// Authenticated user from request extensions, if the middleware set one
pub fn extract_authenticated_user(parts: &Parts) -> Result<AuthenticatedUser, BackendError> {
    parts
        .extensions
        .get::<AuthenticatedUser>()
        .cloned()
        .ok_or_else(|| BackendError::unauthorized("Authentication required"))
}

/// Axum extractor for the authenticated user
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        extract_authenticated_user(parts).map(AuthUser)
    }
}
