//! In-memory store
//!
//! All tables live behind one `RwLock`, so each trait call is atomic with
//! respect to every other. That is what lets the conversation table enforce
//! pair uniqueness the same way the database's unique index does.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    CartStore, ConversationStore, FavoriteStore, ListingOrdering, ListingPage, ListingQuery, ListingStore,
    MessageStore, StoreError, UserStore,
};
use crate::backend::auth::users::User;
use crate::shared::cart::{CartItem, MAX_LINE_QUANTITY};
use crate::shared::listing::{Favorite, Listing};
use crate::shared::messaging::{pair_key, ChatMessage, Conversation, NewMessage};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    listings: HashMap<Uuid, Listing>,
    favorites: Vec<Favorite>,
    cart: Vec<CartItem>,
    /// Insertion order is kept so equal timestamps list deterministically
    conversations: Vec<Conversation>,
    messages: HashMap<Uuid, ChatMessage>,
    next_seq: i64,
}

/// Store backed by process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: User) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(StoreError::Conflict(format!("email {} already registered", user.email)));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }
}

#[async_trait]
impl ListingStore for MemoryStore {
    async fn insert_listing(&self, listing: Listing) -> Result<Listing, StoreError> {
        self.tables.write().await.listings.insert(listing.id, listing.clone());
        Ok(listing)
    }

    async fn listing_by_id(&self, id: Uuid) -> Result<Option<Listing>, StoreError> {
        Ok(self.tables.read().await.listings.get(&id).cloned())
    }

    async fn update_listing(&self, listing: &Listing) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(stored) = tables.listings.get_mut(&listing.id) {
            *stored = listing.clone();
        }
        Ok(())
    }

    async fn delete_listing(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let removed = tables.listings.remove(&id).is_some();
        if removed {
            tables.favorites.retain(|f| f.listing_id != id);
            tables.cart.retain(|c| c.listing_id != id);
        }
        Ok(removed)
    }

    async fn search_listings(&self, query: &ListingQuery) -> Result<ListingPage, StoreError> {
        let tables = self.tables.read().await;
        let mut matching: Vec<Listing> = tables
            .listings
            .values()
            .filter(|l| query.matches(l))
            .cloned()
            .collect();

        matching.sort_by(|a, b| {
            let primary = match query.ordering {
                ListingOrdering::PriceAsc => a.price.cmp(&b.price),
                ListingOrdering::PriceDesc => b.price.cmp(&a.price),
                ListingOrdering::CreatedAsc => a.created_at.cmp(&b.created_at),
                ListingOrdering::CreatedDesc => b.created_at.cmp(&a.created_at),
            };
            primary.then(a.id.cmp(&b.id))
        });

        let total = matching.len() as u64;
        let listings = matching
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .collect();

        Ok(ListingPage { total, listings })
    }
}

#[async_trait]
impl FavoriteStore for MemoryStore {
    async fn add_favorite(&self, favorite: Favorite) -> Result<Favorite, StoreError> {
        let mut tables = self.tables.write().await;
        let exists = tables
            .favorites
            .iter()
            .any(|f| f.user_id == favorite.user_id && f.listing_id == favorite.listing_id);
        if exists {
            return Err(StoreError::Conflict("listing already in favorites".to_string()));
        }
        tables.favorites.push(favorite.clone());
        Ok(favorite)
    }

    async fn remove_favorite(&self, user_id: Uuid, listing_id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.favorites.len();
        tables
            .favorites
            .retain(|f| !(f.user_id == user_id && f.listing_id == listing_id));
        Ok(tables.favorites.len() != before)
    }

    async fn favorites_for(&self, user_id: Uuid) -> Result<Vec<Favorite>, StoreError> {
        let tables = self.tables.read().await;
        // Newest first; later pushes win ties
        Ok(tables
            .favorites
            .iter()
            .rev()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CartStore for MemoryStore {
    async fn add_to_cart(&self, item: CartItem) -> Result<CartItem, StoreError> {
        let mut tables = self.tables.write().await;
        let existing = tables
            .cart
            .iter_mut()
            .find(|c| c.user_id == item.user_id && c.listing_id == item.listing_id);

        match existing {
            Some(line) => {
                let merged = line.quantity.saturating_add(item.quantity);
                if merged > MAX_LINE_QUANTITY {
                    return Err(StoreError::Conflict("cart line quantity limit reached".to_string()));
                }
                line.quantity = merged;
                Ok(line.clone())
            }
            None => {
                tables.cart.push(item.clone());
                Ok(item)
            }
        }
    }

    async fn remove_from_cart(&self, user_id: Uuid, listing_id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.cart.len();
        tables
            .cart
            .retain(|c| !(c.user_id == user_id && c.listing_id == listing_id));
        Ok(tables.cart.len() != before)
    }

    async fn cart_for(&self, user_id: Uuid) -> Result<Vec<CartItem>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.cart.iter().filter(|c| c.user_id == user_id).cloned().collect())
    }
}

#[async_trait]
impl ConversationStore for MemoryStore {
    async fn insert_conversation(&self, conversation: Conversation) -> Result<Conversation, StoreError> {
        let mut tables = self.tables.write().await;
        let key = conversation.pair_key();
        if tables.conversations.iter().any(|c| c.pair_key() == key) {
            return Err(StoreError::Conflict(
                "conversation already exists for these participants".to_string(),
            ));
        }
        tables.conversations.push(conversation.clone());
        Ok(conversation)
    }

    async fn conversation_between(&self, a: Uuid, b: Uuid) -> Result<Option<Conversation>, StoreError> {
        let key = pair_key(a, b);
        let tables = self.tables.read().await;
        Ok(tables.conversations.iter().find(|c| c.pair_key() == key).cloned())
    }

    async fn conversation_by_id(&self, id: Uuid) -> Result<Option<Conversation>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.conversations.iter().find(|c| c.id == id).cloned())
    }

    async fn conversations_for(&self, user_id: Uuid) -> Result<Vec<Conversation>, StoreError> {
        let tables = self.tables.read().await;
        let mut conversations: Vec<Conversation> = tables
            .conversations
            .iter()
            .filter(|c| c.has_participant(user_id))
            .cloned()
            .collect();
        conversations.sort_by_key(|c| c.created_at);
        Ok(conversations)
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn insert_message(&self, message: NewMessage) -> Result<ChatMessage, StoreError> {
        let mut tables = self.tables.write().await;
        tables.next_seq += 1;
        let stored = ChatMessage {
            id: message.id,
            conversation_id: message.conversation_id,
            sender_id: message.sender_id,
            content: message.content,
            created_at: message.created_at,
            seq: tables.next_seq,
            is_read: false,
        };
        tables.messages.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn message_by_id(&self, id: Uuid) -> Result<Option<ChatMessage>, StoreError> {
        Ok(self.tables.read().await.messages.get(&id).cloned())
    }

    async fn messages_in(&self, conversation_id: Uuid) -> Result<Vec<ChatMessage>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .messages
            .values()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect())
    }

    async fn set_read(&self, id: Uuid) -> Result<Option<ChatMessage>, StoreError> {
        let mut tables = self.tables.write().await;
        Ok(tables.messages.get_mut(&id).map(|m| {
            m.is_read = true;
            m.clone()
        }))
    }
}
