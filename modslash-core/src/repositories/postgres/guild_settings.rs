// modslash-core/src/repositories/postgres/guild_settings.rs
//
// Stores the per-guild settings document in the `guild_settings` table, one row per
// guild, as JSONB. Guilds without a row read as the default (empty) document; the row
// is created by the first save.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};
use twilight_model::id::Id;
use twilight_model::id::marker::GuildMarker;

use modslash_common::models::GuildSettings;
use modslash_common::traits::repository_traits::GuildSettingsRepository;

use crate::Error;

#[derive(Clone)]
pub struct PostgresGuildSettingsRepository {
    pool: Pool<Postgres>,
}

impl PostgresGuildSettingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GuildSettingsRepository for PostgresGuildSettingsRepository {
    async fn load(&self, guild_id: Id<GuildMarker>) -> Result<GuildSettings, Error> {
        let row_opt = sqlx::query(
            r#"
            SELECT settings
            FROM guild_settings
            WHERE guild_id = $1
            "#,
        )
            .bind(guild_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        match row_opt {
            Some(r) => {
                let value: serde_json::Value = r.try_get("settings")?;
                Ok(serde_json::from_value(value)?)
            }
            None => Ok(GuildSettings::default()),
        }
    }

    async fn save(&self, guild_id: Id<GuildMarker>, settings: &GuildSettings) -> Result<(), Error> {
        let value = serde_json::to_value(settings)?;
        sqlx::query(
            r#"
            INSERT INTO guild_settings (guild_id, settings)
            VALUES ($1, $2)
            ON CONFLICT (guild_id)
            DO UPDATE SET settings = EXCLUDED.settings,
                          updated_at = now()
            "#,
        )
            .bind(guild_id.to_string())
            .bind(value)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
