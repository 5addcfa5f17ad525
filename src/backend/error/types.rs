/**
 * Backend Error Types
 *
 * Every handler returns `Result<_, BackendError>`. Domain errors from the
 * messaging services and the store convert in with `?` and pick their HTTP
 * status here, so handlers never choose a status for a domain failure.
 *
 * # Status Mapping
 *
 * - `HandlerError` - whatever status the handler chose
 * - `SharedError` - 400 for validation, 500 for serialization
 * - `Messaging` - 400 invalid participants, 403 not a participant, 404 not found
 * - `Store` - 400 for a conflict, 500 for a database failure
 */

use axum::http::StatusCode;
use thiserror::Error;
use tracing::error;

use crate::backend::messaging::MessagingError;
use crate::backend::store::StoreError;
use crate::shared::SharedError;

/// Backend-specific error types
#[derive(Debug, Error)]
pub enum BackendError {
    /// Handler error (e.g. missing credentials, bad query parameter)
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// Shared error (from shared module)
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Conversation or message rule violated
    #[error(transparent)]
    Messaging(#[from] MessagingError),

    /// Persistence failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::NOT_FOUND, message)
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::SharedError(err) => shared_status(err),
            Self::SerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Messaging(err) => match err {
                MessagingError::InvalidParticipants => StatusCode::BAD_REQUEST,
                MessagingError::NotAParticipant => StatusCode::FORBIDDEN,
                MessagingError::NotFound(_) => StatusCode::NOT_FOUND,
                MessagingError::Validation(shared) => shared_status(shared),
                MessagingError::Store(store) => store_status(store),
            },
            Self::Store(err) => store_status(err),
        }
    }

    /// Get the error message.
    ///
    /// Database failures are logged here and reported to the client without
    /// their details.
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::SharedError(err) => err.to_string(),
            Self::SerializationError(err) => err.to_string(),
            Self::Messaging(MessagingError::Store(err)) | Self::Store(err) => store_message(err),
            Self::Messaging(err) => err.to_string(),
        }
    }
}

fn shared_status(err: &SharedError) -> StatusCode {
    match err {
        SharedError::SerializationError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        SharedError::ValidationError { .. } => StatusCode::BAD_REQUEST,
    }
}

fn store_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::Conflict(_) => StatusCode::BAD_REQUEST,
        StoreError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn store_message(err: &StoreError) -> String {
    match err {
        StoreError::Conflict(what) => what.clone(),
        StoreError::Database(db) => {
            error!(error = %db, "Database operation failed");
            "Internal server error".to_string()
        }
    }
}
