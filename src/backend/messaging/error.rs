//! Messaging errors

use thiserror::Error;

use crate::backend::store::StoreError;
use crate::shared::SharedError;

#[derive(Debug, Error)]
pub enum MessagingError {
    /// Both sides of a conversation are the same user
    #[error("Cannot start a conversation with yourself")]
    InvalidParticipants,

    /// The user takes no part in the conversation
    #[error("User is not a participant in this conversation")]
    NotAParticipant,

    /// Absent, or not visible to the requester
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error(transparent)]
    Validation(#[from] SharedError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
