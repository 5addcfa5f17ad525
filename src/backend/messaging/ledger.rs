//! Message Ledger
//!
//! Append-only messages per conversation. The listing order is an explicit
//! contract rather than whatever the store returns: ascending `created_at`,
//! ties broken by the store-assigned insertion sequence.

use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use super::error::MessagingError;
use crate::backend::store::{ConversationStore, MessageStore};
use crate::shared::messaging::{ChatMessage, Conversation, MessageView, NewMessage, MAX_CONTENT_LEN};
use crate::shared::SharedError;

#[derive(Clone)]
pub struct MessageLedger {
    messages: Arc<dyn MessageStore>,
    conversations: Arc<dyn ConversationStore>,
}

impl MessageLedger {
    pub fn new(messages: Arc<dyn MessageStore>, conversations: Arc<dyn ConversationStore>) -> Self {
        Self {
            messages,
            conversations,
        }
    }

    /// Append a message from `sender` to `conversation`
    pub async fn append(
        &self,
        conversation: &Conversation,
        sender: Uuid,
        content: &str,
    ) -> Result<ChatMessage, MessagingError> {
        if !conversation.has_participant(sender) {
            return Err(MessagingError::NotAParticipant);
        }
        validate_content(content)?;

        let message = self
            .messages
            .insert_message(NewMessage::new(conversation.id, sender, content.to_string()))
            .await?;

        info!(
            conversation_id = %conversation.id,
            message_id = %message.id,
            seq = message.seq,
            "Message appended"
        );
        Ok(message)
    }

    /// Messages of `conversation`, oldest first
    pub async fn list_by_conversation(&self, conversation: &Conversation) -> Result<Vec<ChatMessage>, MessagingError> {
        let mut messages = self.messages.messages_in(conversation.id).await?;
        messages.sort_by(ChatMessage::chronological);
        Ok(messages)
    }

    /// Mark a message read on behalf of `user_id`. Marking twice is fine.
    pub async fn mark_read(&self, message_id: Uuid, user_id: Uuid) -> Result<ChatMessage, MessagingError> {
        let message = self
            .messages
            .message_by_id(message_id)
            .await?
            .ok_or(MessagingError::NotFound("message"))?;

        let visible = self
            .conversations
            .conversation_by_id(message.conversation_id)
            .await?
            .is_some_and(|c| c.has_participant(user_id));
        if !visible {
            return Err(MessagingError::NotFound("message"));
        }

        if message.is_read {
            debug!(message_id = %message_id, "Message already read");
            return Ok(message);
        }

        self.messages
            .set_read(message_id)
            .await?
            .ok_or(MessagingError::NotFound("message"))
    }

    /// Client view of `message`, with the receiver derived from `conversation`
    pub fn view(message: ChatMessage, conversation: &Conversation) -> Result<MessageView, MessagingError> {
        MessageView::new(message, conversation).ok_or(MessagingError::NotAParticipant)
    }

    /// Views of every message in `conversation`, oldest first
    pub async fn views(&self, conversation: &Conversation) -> Result<Vec<MessageView>, MessagingError> {
        self.list_by_conversation(conversation)
            .await?
            .into_iter()
            .map(|m| Self::view(m, conversation))
            .collect()
    }
}

fn validate_content(content: &str) -> Result<(), SharedError> {
    if content.trim().is_empty() {
        return Err(SharedError::validation("content", "Message content cannot be empty"));
    }
    if content.chars().count() > MAX_CONTENT_LEN {
        return Err(SharedError::validation(
            "content",
            format!("Message content cannot exceed {} characters", MAX_CONTENT_LEN),
        ));
    }
    Ok(())
}
