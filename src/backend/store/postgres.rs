//! PostgreSQL store
//!
//! Schema lives in `migrations/`. Uniqueness rules are enforced by the
//! database (unique indexes) and surfaced as `StoreError::Conflict`.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::warn;
use uuid::Uuid;

use super::{
    CartStore, ConversationStore, FavoriteStore, ListingOrdering, ListingPage, ListingQuery, ListingStore,
    MessageStore, StoreError, UserStore,
};
use crate::backend::auth::users::{Role, User};
use crate::shared::cart::{CartItem, MAX_LINE_QUANTITY};
use crate::shared::listing::{Favorite, Listing, ListingStatus};
use crate::shared::messaging::{ChatMessage, Conversation, NewMessage};
use crate::shared::Currency;

const LISTING_COLUMNS: &str = "id, title, description, price, currency, category_id, city_id, \
                               seller_id, owner_id, status, created_at";

const MESSAGE_COLUMNS: &str = "id, conversation_id, sender_id, content, created_at, seq, is_read";

/// Store backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Unique violations become `Conflict`, everything else stays a database error
fn conflict_or_database(err: sqlx::Error, what: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Conflict(what.to_string()),
        _ => StoreError::Database(err),
    }
}

fn user_from_row(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        password_hash: row.get("password_hash"),
        role: Role::from_db(row.get::<String, _>("role").as_str()),
        created_at: row.get("created_at"),
    }
}

/// Unknown codes fall back to the home currency
fn currency_from_db(code: String) -> Currency {
    code.parse().unwrap_or_else(|_| {
        warn!(code = %code, "Unknown currency stored on a listing, using the home currency");
        Currency::default()
    })
}

fn listing_from_row(row: &PgRow) -> Listing {
    Listing {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        price: row.get("price"),
        currency: currency_from_db(row.get("currency")),
        category_id: row.get("category_id"),
        city_id: row.get("city_id"),
        seller_id: row.get("seller_id"),
        owner_id: row.get("owner_id"),
        status: ListingStatus::from_db(row.get::<String, _>("status").as_str()),
        created_at: row.get("created_at"),
    }
}

fn cart_item_from_row(row: &PgRow) -> CartItem {
    CartItem {
        user_id: row.get("user_id"),
        listing_id: row.get("listing_id"),
        // CHECK (quantity > 0) keeps this in range
        quantity: u32::try_from(row.get::<i32, _>("quantity")).unwrap_or_default(),
        added_at: row.get("added_at"),
    }
}

fn conversation_from_row(row: &PgRow) -> Conversation {
    Conversation {
        id: row.get("id"),
        sender_id: row.get("sender_id"),
        receiver_id: row.get("receiver_id"),
        created_at: row.get("created_at"),
    }
}

fn message_from_row(row: &PgRow) -> ChatMessage {
    ChatMessage {
        id: row.get("id"),
        conversation_id: row.get("conversation_id"),
        sender_id: row.get("sender_id"),
        content: row.get("content"),
        created_at: row.get("created_at"),
        seq: row.get("seq"),
        is_read: row.get("is_read"),
    }
}

/// Escape `%`, `_` and `\` so user input matches literally under ILIKE
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn push_listing_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &ListingQuery) {
    builder.push(" WHERE TRUE");
    if let Some(min) = query.min_price {
        builder.push(" AND price >= ").push_bind(min);
    }
    if let Some(max) = query.max_price {
        builder.push(" AND price <= ").push_bind(max);
    }
    if let Some(category_id) = query.category_id {
        builder.push(" AND category_id = ").push_bind(category_id);
    }
    if let Some(seller_id) = query.seller_id {
        builder.push(" AND seller_id = ").push_bind(seller_id);
    }
    if let Some(term) = query.search.as_deref() {
        let pattern = like_pattern(term);
        builder
            .push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

fn order_clause(ordering: ListingOrdering) -> &'static str {
    match ordering {
        ListingOrdering::PriceAsc => " ORDER BY price ASC, id ASC",
        ListingOrdering::PriceDesc => " ORDER BY price DESC, id ASC",
        ListingOrdering::CreatedAsc => " ORDER BY created_at ASC, id ASC",
        ListingOrdering::CreatedDesc => " ORDER BY created_at DESC, id ASC",
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, user: User) -> Result<User, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, first_name, last_name, password_hash, role, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or_database(e, "email already registered"))?;

        Ok(user)
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, first_name, last_name, password_hash, role, created_at
            FROM users
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, first_name, last_name, password_hash, role, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }
}

#[async_trait]
impl ListingStore for PgStore {
    async fn insert_listing(&self, listing: Listing) -> Result<Listing, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO listings (id, title, description, price, currency, category_id, city_id,
                                  seller_id, owner_id, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(listing.id)
        .bind(&listing.title)
        .bind(&listing.description)
        .bind(listing.price)
        .bind(listing.currency.code())
        .bind(listing.category_id)
        .bind(listing.city_id)
        .bind(listing.seller_id)
        .bind(listing.owner_id)
        .bind(listing.status.as_str())
        .bind(listing.created_at)
        .execute(&self.pool)
        .await?;

        Ok(listing)
    }

    async fn listing_by_id(&self, id: Uuid) -> Result<Option<Listing>, StoreError> {
        let row = sqlx::query(&format!("SELECT {} FROM listings WHERE id = $1", LISTING_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(listing_from_row))
    }

    async fn update_listing(&self, listing: &Listing) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE listings
            SET title = $1, description = $2, price = $3, currency = $4,
                category_id = $5, city_id = $6, status = $7
            WHERE id = $8
            "#,
        )
        .bind(&listing.title)
        .bind(&listing.description)
        .bind(listing.price)
        .bind(listing.currency.code())
        .bind(listing.category_id)
        .bind(listing.city_id)
        .bind(listing.status.as_str())
        .bind(listing.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_listing(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM listings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn search_listings(&self, query: &ListingQuery) -> Result<ListingPage, StoreError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM listings");
        push_listing_filters(&mut count, query);
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM listings", LISTING_COLUMNS));
        push_listing_filters(&mut select, query);
        select.push(order_clause(query.ordering));
        select.push(" LIMIT ").push_bind(query.limit as i64);
        select.push(" OFFSET ").push_bind(query.offset as i64);

        let rows = select.build().fetch_all(&self.pool).await?;

        Ok(ListingPage {
            total: total.max(0) as u64,
            listings: rows.iter().map(listing_from_row).collect(),
        })
    }
}

#[async_trait]
impl FavoriteStore for PgStore {
    async fn add_favorite(&self, favorite: Favorite) -> Result<Favorite, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO favorites (user_id, listing_id, created_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(favorite.user_id)
        .bind(favorite.listing_id)
        .bind(favorite.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or_database(e, "listing already in favorites"))?;

        Ok(favorite)
    }

    async fn remove_favorite(&self, user_id: Uuid, listing_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND listing_id = $2")
            .bind(user_id)
            .bind(listing_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn favorites_for(&self, user_id: Uuid) -> Result<Vec<Favorite>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT user_id, listing_id, created_at
            FROM favorites
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| Favorite {
                user_id: row.get("user_id"),
                listing_id: row.get("listing_id"),
                created_at: row.get("created_at"),
            })
            .collect())
    }
}

#[async_trait]
impl CartStore for PgStore {
    async fn add_to_cart(&self, item: CartItem) -> Result<CartItem, StoreError> {
        let limit_reached = || StoreError::Conflict("cart line quantity limit reached".to_string());
        let quantity = i32::try_from(item.quantity).map_err(|_| limit_reached())?;

        // The WHERE on the update arm makes an over-limit merge return no row
        let row = sqlx::query(
            r#"
            INSERT INTO cart_items (user_id, listing_id, quantity, added_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, listing_id) DO UPDATE
                SET quantity = cart_items.quantity + EXCLUDED.quantity
                WHERE cart_items.quantity + EXCLUDED.quantity <= $5
            RETURNING user_id, listing_id, quantity, added_at
            "#,
        )
        .bind(item.user_id)
        .bind(item.listing_id)
        .bind(quantity)
        .bind(item.added_at)
        .bind(MAX_LINE_QUANTITY as i32)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(cart_item_from_row).ok_or_else(limit_reached)
    }

    async fn remove_from_cart(&self, user_id: Uuid, listing_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND listing_id = $2")
            .bind(user_id)
            .bind(listing_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn cart_for(&self, user_id: Uuid) -> Result<Vec<CartItem>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT user_id, listing_id, quantity, added_at
            FROM cart_items
            WHERE user_id = $1
            ORDER BY added_at, listing_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(cart_item_from_row).collect())
    }
}

#[async_trait]
impl ConversationStore for PgStore {
    async fn insert_conversation(&self, conversation: Conversation) -> Result<Conversation, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO conversations (id, sender_id, receiver_id, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(conversation.id)
        .bind(conversation.sender_id)
        .bind(conversation.receiver_id)
        .bind(conversation.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or_database(e, "conversation already exists for these participants"))?;

        Ok(conversation)
    }

    async fn conversation_between(&self, a: Uuid, b: Uuid) -> Result<Option<Conversation>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, sender_id, receiver_id, created_at
            FROM conversations
            WHERE (sender_id = $1 AND receiver_id = $2)
               OR (sender_id = $2 AND receiver_id = $1)
            "#,
        )
        .bind(a)
        .bind(b)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(conversation_from_row))
    }

    async fn conversation_by_id(&self, id: Uuid) -> Result<Option<Conversation>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, sender_id, receiver_id, created_at
            FROM conversations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(conversation_from_row))
    }

    async fn conversations_for(&self, user_id: Uuid) -> Result<Vec<Conversation>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, sender_id, receiver_id, created_at
            FROM conversations
            WHERE sender_id = $1 OR receiver_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(conversation_from_row).collect())
    }
}

#[async_trait]
impl MessageStore for PgStore {
    async fn insert_message(&self, message: NewMessage) -> Result<ChatMessage, StoreError> {
        let seq: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO messages (id, conversation_id, sender_id, content, created_at, is_read)
            VALUES ($1, $2, $3, $4, $5, FALSE)
            RETURNING seq
            "#,
        )
        .bind(message.id)
        .bind(message.conversation_id)
        .bind(message.sender_id)
        .bind(&message.content)
        .bind(message.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(ChatMessage {
            id: message.id,
            conversation_id: message.conversation_id,
            sender_id: message.sender_id,
            content: message.content,
            created_at: message.created_at,
            seq,
            is_read: false,
        })
    }

    async fn message_by_id(&self, id: Uuid) -> Result<Option<ChatMessage>, StoreError> {
        let row = sqlx::query(&format!("SELECT {} FROM messages WHERE id = $1", MESSAGE_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(message_from_row))
    }

    async fn messages_in(&self, conversation_id: Uuid) -> Result<Vec<ChatMessage>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM messages WHERE conversation_id = $1 ORDER BY created_at ASC, seq ASC",
            MESSAGE_COLUMNS
        ))
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(message_from_row).collect())
    }

    async fn set_read(&self, id: Uuid) -> Result<Option<ChatMessage>, StoreError> {
        let row = sqlx::query(&format!(
            "UPDATE messages SET is_read = TRUE WHERE id = $1 RETURNING {}",
            MESSAGE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(message_from_row))
    }
}
