//! Chat Message Data Structure
//!
//! Represents a message in a conversation. Messages are ordered by
//! `created_at`, ties broken by `seq`, the store-assigned insertion counter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

use super::conversation::Conversation;

/// Longest accepted message body, in characters
pub const MAX_CONTENT_LEN: usize = 4000;

/// Represents a chat message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    /// Unique message ID
    pub id: Uuid,
    /// Conversation this message belongs to
    pub conversation_id: Uuid,
    /// User who sent the message
    pub sender_id: Uuid,
    /// Message text
    pub content: String,
    /// When the message was sent
    pub created_at: DateTime<Utc>,
    /// Monotonic insertion order, assigned by the store
    pub seq: i64,
    /// Whether the message has been read
    pub is_read: bool,
}

impl ChatMessage {
    /// Chronological order: timestamp first, insertion order on ties
    pub fn chronological(a: &ChatMessage, b: &ChatMessage) -> Ordering {
        a.created_at.cmp(&b.created_at).then(a.seq.cmp(&b.seq))
    }
}

/// A message not yet persisted; the store assigns `seq`
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl NewMessage {
    pub fn new(conversation_id: Uuid, sender_id: Uuid, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            conversation_id,
            sender_id,
            content,
            created_at: Utc::now(),
        }
    }
}

/// Request to send a message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub conversation_id: Uuid,
    pub content: String,
}

/// A message as returned by the API, with its derived receiver
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageView {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
}

impl MessageView {
    /// Attach the receiver computed from the conversation.
    ///
    /// Returns `None` if the sender is not a participant of `conversation`.
    pub fn new(message: ChatMessage, conversation: &Conversation) -> Option<Self> {
        let receiver_id = conversation.other_participant(message.sender_id)?;
        Some(Self {
            id: message.id,
            conversation_id: message.conversation_id,
            sender_id: message.sender_id,
            receiver_id,
            content: message.content,
            created_at: message.created_at,
            is_read: message.is_read,
        })
    }
}

/// Response for listing messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListMessagesResponse {
    pub messages: Vec<MessageView>,
}
