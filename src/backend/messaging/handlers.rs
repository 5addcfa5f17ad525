//! Messaging HTTP Handlers
//!
//! Conversations and messages under `/api/chat`. Every handler requires an
//! authenticated user; domain errors map to statuses in `BackendError`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use super::{ConversationRegistry, MessageLedger, MessagingError};
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::store::UserStore;
use crate::shared::messaging::{
    Conversation, ListConversationsResponse, ListMessagesResponse, MessageView, SendMessageRequest,
    StartConversationRequest,
};
use crate::shared::SharedError;

/// POST /api/chat/conversations
///
/// Returns the existing conversation with `receiver_id` or opens one.
pub async fn start_conversation(
    State(registry): State<ConversationRegistry>,
    State(users): State<Arc<dyn UserStore>>,
    AuthUser(user): AuthUser,
    Json(request): Json<StartConversationRequest>,
) -> Result<Json<Conversation>, BackendError> {
    if request.receiver_id != user.user_id && users.user_by_id(request.receiver_id).await?.is_none() {
        warn!(receiver = %request.receiver_id, "Conversation requested with unknown user");
        return Err(SharedError::validation("receiver_id", "Receiver does not exist").into());
    }

    let conversation = registry.get_or_create(user.user_id, request.receiver_id).await?;
    Ok(Json(conversation))
}

/// GET /api/chat/conversations
pub async fn list_conversations(
    State(registry): State<ConversationRegistry>,
    AuthUser(user): AuthUser,
) -> Result<Json<ListConversationsResponse>, BackendError> {
    let conversations = registry.list_for_user(user.user_id).await?;
    Ok(Json(ListConversationsResponse { conversations }))
}

/// GET /api/chat/conversations/{conversation_id}/messages
pub async fn list_messages(
    State(registry): State<ConversationRegistry>,
    State(ledger): State<MessageLedger>,
    AuthUser(user): AuthUser,
    Path(conversation_id): Path<Uuid>,
) -> Result<Json<ListMessagesResponse>, BackendError> {
    let conversation = registry.for_participant(conversation_id, user.user_id).await?;
    let messages = ledger.views(&conversation).await?;
    Ok(Json(ListMessagesResponse { messages }))
}

/// POST /api/chat/messages
pub async fn send_message(
    State(registry): State<ConversationRegistry>,
    State(ledger): State<MessageLedger>,
    AuthUser(user): AuthUser,
    Json(request): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<MessageView>), BackendError> {
    let conversation = registry
        .find(request.conversation_id)
        .await?
        .ok_or(MessagingError::NotFound("conversation"))?;

    let message = ledger.append(&conversation, user.user_id, &request.content).await?;
    let view = MessageLedger::view(message, &conversation)?;

    Ok((StatusCode::CREATED, Json(view)))
}

/// PATCH /api/chat/messages/{message_id}/read
pub async fn mark_message_read(
    State(registry): State<ConversationRegistry>,
    State(ledger): State<MessageLedger>,
    AuthUser(user): AuthUser,
    Path(message_id): Path<Uuid>,
) -> Result<Json<MessageView>, BackendError> {
    let message = ledger.mark_read(message_id, user.user_id).await?;
    let conversation = registry.for_participant(message.conversation_id, user.user_id).await?;
    Ok(Json(MessageLedger::view(message, &conversation)?))
}
