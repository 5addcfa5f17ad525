/**
 * Server Initialization
 *
 * 1. Connect the database, if configured
 * 2. Pick PostgreSQL or in-memory stores
 * 3. Build the rate cache, gateway, converter, registry and ledger
 * 4. Assemble the router
 */

use axum::Router;
use std::sync::Arc;
use tracing::info;

use crate::backend::pricing::{ExchangeRateGateway, MemoryRateCache};
use crate::backend::routes::router::create_router;
use crate::backend::server::config::load_database;
use crate::backend::server::state::AppState;
use crate::backend::store::PgStore;
use crate::shared::AppConfig;

/// Create and configure the Axum application
pub async fn create_app(config: AppConfig) -> Router<()> {
    info!("Initializing merkato backend server");

    let db_pool = load_database(config.database_url.as_deref()).await;

    let state = match db_pool {
        Some(pool) => {
            let rates = Arc::new(ExchangeRateGateway::new(&config, Arc::new(MemoryRateCache::new())));
            AppState::with_store(config, Arc::new(PgStore::new(pool.clone())), rates, Some(pool))
        }
        None => AppState::in_memory(config),
    };

    if state.config.rate_api_key.is_none() {
        tracing::warn!("EXCHANGE_RATE_API_KEY not set. Prices will be shown unconverted.");
    }

    create_app_with_state(state)
}

/// Build the router around an existing state
pub fn create_app_with_state(state: AppState) -> Router<()> {
    let app = create_router(state);
    info!("Router configured");
    app
}
