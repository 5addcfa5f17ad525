/**
 * Application State Management
 *
 * `AppState` is the central state container. Handlers never take the whole
 * thing; they extract the slice they need through `FromRef`:
 *
 * - `AuthState` - users, token keys, password cost
 * - `ListingState` - listings, favorites and the price converter
 * - `CartState` - cart lines, listings and the price converter
 * - `ConversationRegistry`, `MessageLedger`, `Arc<dyn UserStore>` - chat
 *
 * Every store is a trait object, so the same state runs against PostgreSQL
 * or the in-memory tables.
 */

use axum::extract::FromRef;
use sqlx::PgPool;
use std::sync::Arc;

use crate::backend::auth::sessions::JwtKeys;
use crate::backend::messaging::{ConversationRegistry, MessageLedger};
use crate::backend::pricing::{ExchangeRateGateway, MemoryRateCache, PriceConverter, RateLookup};
use crate::backend::store::{
    CartStore, ConversationStore, FavoriteStore, ListingStore, MemoryStore, MessageStore, UserStore,
};
use crate::shared::AppConfig;

/// Users and session keys, for the auth handlers and middleware
#[derive(Clone)]
pub struct AuthState {
    pub users: Arc<dyn UserStore>,
    pub jwt: JwtKeys,
    /// bcrypt work factor for new hashes
    pub password_cost: u32,
}

/// Listings, favorites and price presentation
#[derive(Clone)]
pub struct ListingState {
    pub listings: Arc<dyn ListingStore>,
    pub favorites: Arc<dyn FavoriteStore>,
    pub prices: PriceConverter,
}

/// Cart lines, priced through the same converter as listings
#[derive(Clone)]
pub struct CartState {
    pub carts: Arc<dyn CartStore>,
    pub listings: Arc<dyn ListingStore>,
    pub prices: PriceConverter,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth: AuthState,
    pub listings: ListingState,
    pub cart: CartState,
    pub registry: ConversationRegistry,
    pub ledger: MessageLedger,

    /// Database connection pool
    ///
    /// `None` when the server runs on in-memory stores.
    pub db_pool: Option<PgPool>,
}

impl AppState {
    /// Wire every service onto `store`, with rates from `rates`
    pub fn with_store<S>(config: AppConfig, store: Arc<S>, rates: Arc<dyn RateLookup>, db_pool: Option<PgPool>) -> Self
    where
        S: UserStore + ListingStore + FavoriteStore + CartStore + ConversationStore + MessageStore + 'static,
    {
        let auth = AuthState {
            users: store.clone(),
            jwt: JwtKeys::from_config(&config),
            password_cost: config.password_cost,
        };
        let prices = PriceConverter::new(rates);
        let listings = ListingState {
            listings: store.clone(),
            favorites: store.clone(),
            prices: prices.clone(),
        };
        let cart = CartState {
            carts: store.clone(),
            listings: store.clone(),
            prices,
        };

        Self {
            config: Arc::new(config),
            auth,
            listings,
            cart,
            registry: ConversationRegistry::new(store.clone()),
            ledger: MessageLedger::new(store.clone(), store),
            db_pool,
        }
    }

    /// In-memory stores with the live rate gateway from `config`
    pub fn in_memory(config: AppConfig) -> Self {
        let rates = Arc::new(ExchangeRateGateway::new(&config, Arc::new(MemoryRateCache::new())));
        Self::with_store(config, Arc::new(MemoryStore::new()), rates, None)
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth.clone()
    }
}

impl FromRef<AppState> for ListingState {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.listings.clone()
    }
}

impl FromRef<AppState> for CartState {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.cart.clone()
    }
}

impl FromRef<AppState> for ConversationRegistry {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.registry.clone()
    }
}

impl FromRef<AppState> for MessageLedger {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.ledger.clone()
    }
}

impl FromRef<AppState> for Arc<dyn UserStore> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth.users.clone()
    }
}

impl FromRef<AppState> for Option<PgPool> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}
