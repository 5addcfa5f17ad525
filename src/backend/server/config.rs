/**
 * Server Configuration
 *
 * Connects the optional PostgreSQL database. Failures are logged but never
 * prevent startup: the server falls back to in-memory stores.
 */

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{error, info, warn};

const MAX_CONNECTIONS: u32 = 10;

/// Connect to `database_url` and run migrations
///
/// Returns `None` if no URL is configured, the connection fails, or the
/// migrations fail.
pub async fn load_database(database_url: Option<&str>) -> Option<PgPool> {
    let Some(database_url) = database_url else {
        warn!("DATABASE_URL not set. Using in-memory stores; data will not survive a restart.");
        return None;
    };

    info!("Connecting to database...");

    let pool = match PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(database_url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to create database connection pool: {:?}", e);
            warn!("Falling back to in-memory stores.");
            return None;
        }
    };

    info!("Database connection pool created successfully");

    // Running on a schema we could not migrate would fail on the first query
    if let Err(e) = sqlx::migrate!().run(&pool).await {
        error!("Failed to run database migrations: {}", e);
        warn!("Falling back to in-memory stores.");
        return None;
    }

    info!("Database migrations completed successfully");
    Some(pool)
}
