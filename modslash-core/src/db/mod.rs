// modslash-core/src/db/mod.rs
//
// Postgres pool for the per-guild settings table. Only opened when a database URL is
// configured; otherwise settings stay in memory.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use tracing::info;

use crate::Error;
use crate::repositories::PostgresGuildSettingsRepository;

/// One settings read or write per command, so a small pool is plenty.
const MAX_CONNECTIONS: u32 = 5;

#[derive(Clone)]
pub struct Database {
    pool: Pool<Postgres>,
}

impl Database {
    pub async fn connect(database_url: &str) -> Result<Self, Error> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;

        info!("Connected to settings database (max {MAX_CONNECTIONS} connections)");
        Ok(Self { pool })
    }

    /// Applies the embedded migrations from the workspace `migrations/` folder.
    pub async fn migrate(&self) -> Result<(), Error> {
        sqlx::migrate!("../migrations").run(&self.pool).await?;
        info!("guild_settings schema is up to date");
        Ok(())
    }

    pub fn guild_settings(&self) -> PostgresGuildSettingsRepository {
        PostgresGuildSettingsRepository::new(self.pool.clone())
    }

    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }
}
