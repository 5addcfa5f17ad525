//! Conversation Registry
//!
//! Keeps exactly one conversation per unordered pair of users. The store's
//! uniqueness rule is the source of truth: when two requests race to open
//! the same conversation, the loser's insert conflicts and it re-reads the
//! winner's row instead of reporting an error.

use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use super::error::MessagingError;
use crate::backend::store::{ConversationStore, StoreError};
use crate::shared::messaging::Conversation;

#[derive(Clone)]
pub struct ConversationRegistry {
    conversations: Arc<dyn ConversationStore>,
}

impl ConversationRegistry {
    pub fn new(conversations: Arc<dyn ConversationStore>) -> Self {
        Self { conversations }
    }

    /// The conversation between `requester` and `other`, opened by
    /// `requester` if none exists yet.
    pub async fn get_or_create(&self, requester: Uuid, other: Uuid) -> Result<Conversation, MessagingError> {
        if requester == other {
            return Err(MessagingError::InvalidParticipants);
        }

        if let Some(existing) = self.conversations.conversation_between(requester, other).await? {
            return Ok(existing);
        }

        match self
            .conversations
            .insert_conversation(Conversation::new(requester, other))
            .await
        {
            Ok(created) => {
                info!(conversation_id = %created.id, sender = %requester, receiver = %other, "Conversation opened");
                Ok(created)
            }
            Err(StoreError::Conflict(_)) => {
                debug!(sender = %requester, receiver = %other, "Conversation created concurrently, re-reading");
                self.conversations
                    .conversation_between(requester, other)
                    .await?
                    .ok_or(MessagingError::NotFound("conversation"))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// The participant of `conversation` that is not `known`
    pub fn resolve_other(conversation: &Conversation, known: Uuid) -> Result<Uuid, MessagingError> {
        conversation
            .other_participant(known)
            .ok_or(MessagingError::NotAParticipant)
    }

    /// Every conversation `user_id` takes part in, oldest first
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Conversation>, MessagingError> {
        let mut conversations = self.conversations.conversations_for(user_id).await?;
        conversations.sort_by_key(|c| c.created_at);
        Ok(conversations)
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<Conversation>, MessagingError> {
        Ok(self.conversations.conversation_by_id(id).await?)
    }

    /// Conversation `id` as seen by `user_id`.
    ///
    /// A conversation the user is not part of is reported exactly like a
    /// missing one.
    pub async fn for_participant(&self, id: Uuid, user_id: Uuid) -> Result<Conversation, MessagingError> {
        match self.find(id).await? {
            Some(conversation) if conversation.has_participant(user_id) => Ok(conversation),
            _ => Err(MessagingError::NotFound("conversation")),
        }
    }
}
