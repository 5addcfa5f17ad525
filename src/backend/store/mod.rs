//! Persistence Module
//!
//! Every handler reaches storage through the traits in this module, so the
//! same code runs against PostgreSQL in production and against the
//! in-memory tables in tests (or when no database is configured).
//!
//! # Module Structure
//!
//! ```text
//! store/
//! ├── mod.rs       - Store traits, queries and errors
//! ├── memory.rs    - In-memory implementation
//! └── postgres.rs  - PostgreSQL implementation (sqlx)
//! ```
//!
//! # Uniqueness
//!
//! Both implementations report a violated uniqueness rule (duplicate e-mail,
//! duplicate favorite, second conversation for the same pair of users, a
//! cart line pushed past its quantity limit) as
//! [`StoreError::Conflict`]. Callers decide whether that is a user error or
//! something to recover from.

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::backend::auth::users::User;
use crate::shared::cart::CartItem;
use crate::shared::listing::{Favorite, Listing};
use crate::shared::messaging::{ChatMessage, Conversation, NewMessage};

/// In-memory implementation
pub mod memory;

/// PostgreSQL implementation
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Persistence failures
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness rule was violated
    #[error("conflict: {0}")]
    Conflict(String),

    /// Any other database failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Sort order for listing searches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingOrdering {
    PriceAsc,
    PriceDesc,
    CreatedAsc,
    #[default]
    CreatedDesc,
}

impl ListingOrdering {
    /// Parse the `ordering` query value (`price`, `-price`, `created_at`, `-created_at`)
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "price" => Some(Self::PriceAsc),
            "-price" => Some(Self::PriceDesc),
            "created_at" => Some(Self::CreatedAsc),
            "-created_at" => Some(Self::CreatedDesc),
            _ => None,
        }
    }
}

/// Filters, ordering and window for a listing search
#[derive(Debug, Clone, Default)]
pub struct ListingQuery {
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub category_id: Option<Uuid>,
    /// Case-insensitive substring of title or description
    pub search: Option<String>,
    /// Restrict to one seller
    pub seller_id: Option<Uuid>,
    pub ordering: ListingOrdering,
    pub offset: u64,
    pub limit: u64,
}

impl ListingQuery {
    /// Whether `listing` passes every filter
    pub fn matches(&self, listing: &Listing) -> bool {
        if self.min_price.is_some_and(|min| listing.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| listing.price > max) {
            return false;
        }
        if self.category_id.is_some() && listing.category_id != self.category_id {
            return false;
        }
        if self.seller_id.is_some() && listing.seller_id != self.seller_id {
            return false;
        }
        if let Some(term) = self.search.as_deref() {
            let term = term.to_lowercase();
            if !listing.title.to_lowercase().contains(&term)
                && !listing.description.to_lowercase().contains(&term)
            {
                return false;
            }
        }
        true
    }
}

/// One window of a listing search plus the unwindowed total
#[derive(Debug, Clone, Default)]
pub struct ListingPage {
    pub total: u64,
    pub listings: Vec<Listing>,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user; a taken e-mail is a `Conflict`
    async fn create_user(&self, user: User) -> Result<User, StoreError>;

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
}

#[async_trait]
pub trait ListingStore: Send + Sync {
    async fn insert_listing(&self, listing: Listing) -> Result<Listing, StoreError>;

    async fn listing_by_id(&self, id: Uuid) -> Result<Option<Listing>, StoreError>;

    /// Overwrite the mutable fields of an existing listing
    async fn update_listing(&self, listing: &Listing) -> Result<(), StoreError>;

    /// Returns `false` if there was nothing to delete
    async fn delete_listing(&self, id: Uuid) -> Result<bool, StoreError>;

    async fn search_listings(&self, query: &ListingQuery) -> Result<ListingPage, StoreError>;
}

#[async_trait]
pub trait FavoriteStore: Send + Sync {
    /// Record a favorite; a repeat for the same listing is a `Conflict`
    async fn add_favorite(&self, favorite: Favorite) -> Result<Favorite, StoreError>;

    async fn remove_favorite(&self, user_id: Uuid, listing_id: Uuid) -> Result<bool, StoreError>;

    /// The user's favorites, newest first
    async fn favorites_for(&self, user_id: Uuid) -> Result<Vec<Favorite>, StoreError>;
}

#[async_trait]
pub trait CartStore: Send + Sync {
    /// Add `item` to its owner's cart, merging into an existing line for the
    /// same listing. A merge past `MAX_LINE_QUANTITY` is a `Conflict` and
    /// leaves the line unchanged.
    async fn add_to_cart(&self, item: CartItem) -> Result<CartItem, StoreError>;

    async fn remove_from_cart(&self, user_id: Uuid, listing_id: Uuid) -> Result<bool, StoreError>;

    /// The user's cart lines in the order they were first added
    async fn cart_for(&self, user_id: Uuid) -> Result<Vec<CartItem>, StoreError>;
}

#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Insert a conversation; an existing one for the same unordered pair is a `Conflict`
    async fn insert_conversation(&self, conversation: Conversation) -> Result<Conversation, StoreError>;

    /// The conversation between `a` and `b`, whoever opened it
    async fn conversation_between(&self, a: Uuid, b: Uuid) -> Result<Option<Conversation>, StoreError>;

    async fn conversation_by_id(&self, id: Uuid) -> Result<Option<Conversation>, StoreError>;

    /// Every conversation `user_id` takes part in, oldest first
    async fn conversations_for(&self, user_id: Uuid) -> Result<Vec<Conversation>, StoreError>;
}

#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persist a message, assigning its insertion sequence
    async fn insert_message(&self, message: NewMessage) -> Result<ChatMessage, StoreError>;

    async fn message_by_id(&self, id: Uuid) -> Result<Option<ChatMessage>, StoreError>;

    /// Messages of one conversation in no guaranteed order
    async fn messages_in(&self, conversation_id: Uuid) -> Result<Vec<ChatMessage>, StoreError>;

    /// Set `is_read`, returning the updated message if it exists
    async fn set_read(&self, id: Uuid) -> Result<Option<ChatMessage>, StoreError>;
}
