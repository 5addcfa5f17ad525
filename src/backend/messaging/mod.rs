//! Messaging Module
//!
//! This module handles one-to-one conversations and their messages.
//!
//! - **`registry`** - `ConversationRegistry`: one conversation per pair of users
//! - **`ledger`** - `MessageLedger`: ordered messages and read state
//! - **`handlers`** - HTTP handlers under `/api/chat`
//! - **`error`** - `MessagingError`

pub mod error;
pub mod registry;
pub mod ledger;
pub mod handlers;

pub use error::MessagingError;
pub use ledger::MessageLedger;
pub use registry::ConversationRegistry;
