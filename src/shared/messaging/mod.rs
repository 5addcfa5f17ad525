//! Messaging Module
//!
//! This module contains the data structures for one-to-one chat:
//!
//! - `Conversation` - A conversation between two users
//! - `ChatMessage` - A message in a conversation
//! - `MessageView` - A message with its derived receiver, as sent to clients
//!
//! # Usage
//!
//! ```rust
//! use merkato::shared::messaging::{ChatMessage, Conversation};
//! ```

pub mod conversation;
pub mod message;

// Re-export all types
pub use conversation::{
    pair_key, Conversation, ListConversationsResponse, StartConversationRequest,
};
pub use message::{
    ChatMessage, ListMessagesResponse, MessageView, NewMessage, SendMessageRequest,
    MAX_CONTENT_LEN,
};
