//! # Bastion DB
//!
//! Persistence for the Bastion API.
//!
//! - [`init_db_pool`] and [`run_migrations`] set up PostgreSQL at startup
//! - [`UserStore`] is the seam between the auth services and storage
//! - [`PgUserStore`] is the production implementation
//! - `MemoryUserStore` (feature `test-utils`) backs the HTTP tests
//!
//! Every lookup ignores soft-deleted rows. Token rotation and reset
//! consumption are single conditional statements, so concurrent callers
//! presenting the same token cannot both win.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use bastion_db::{PgUserStore, UserStore, init_db_pool, run_migrations};
//!
//! let pool = init_db_pool(&config.database).await?;
//! run_migrations(&pool).await?;
//! let store: Arc<dyn UserStore> = Arc::new(PgUserStore::new(pool));
//! ```

use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use bastion_config::DatabaseConfig;

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod postgres;
pub mod store;

#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;
pub use store::{NewUser, UserStore};

// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// Connects a PostgreSQL pool sized from `config`.
///
/// Called once at startup; the returned pool is cheap to clone.
pub async fn init_db_pool(config: &DatabaseConfig) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.url)
        .await
        .context("failed to connect to database")
}

/// Applies the embedded migrations in `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .context("failed to run database migrations")?;
    tracing::info!("database migrations applied");
    Ok(())
}
