//! Conversation Data Structure
//!
//! Represents a one-to-one conversation between two users. The stored
//! (sender, receiver) order records who opened it; identity for uniqueness
//! purposes is the unordered pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a conversation between two users
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Conversation {
    /// Unique conversation ID
    pub id: Uuid,
    /// User who opened the conversation
    pub sender_id: Uuid,
    /// The other participant
    pub receiver_id: Uuid,
    /// When the conversation was created
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a new conversation opened by `sender_id`
    pub fn new(sender_id: Uuid, receiver_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender_id,
            receiver_id,
            created_at: Utc::now(),
        }
    }

    /// Check if user is a participant
    pub fn has_participant(&self, user_id: Uuid) -> bool {
        self.sender_id == user_id || self.receiver_id == user_id
    }

    /// Get the participant that is not `known`, if `known` takes part at all
    pub fn other_participant(&self, known: Uuid) -> Option<Uuid> {
        if known == self.sender_id {
            Some(self.receiver_id)
        } else if known == self.receiver_id {
            Some(self.sender_id)
        } else {
            None
        }
    }

    /// Order-independent identity of the participant pair
    pub fn pair_key(&self) -> (Uuid, Uuid) {
        pair_key(self.sender_id, self.receiver_id)
    }
}

/// The unordered pair {a, b} as a canonical (low, high) tuple
pub fn pair_key(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Request to open (or reopen) a conversation with another user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartConversationRequest {
    pub receiver_id: Uuid,
}

/// Response for listing conversations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConversationsResponse {
    pub conversations: Vec<Conversation>,
}
