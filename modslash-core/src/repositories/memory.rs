// modslash-core/src/repositories/memory.rs
//
// Volatile settings store, used when no database is configured and by tests.

use async_trait::async_trait;
use dashmap::DashMap;
use twilight_model::id::Id;
use twilight_model::id::marker::GuildMarker;

use modslash_common::models::GuildSettings;
use modslash_common::traits::repository_traits::GuildSettingsRepository;

use crate::Error;

#[derive(Debug, Default)]
pub struct InMemoryGuildSettingsRepository {
    settings: DashMap<Id<GuildMarker>, GuildSettings>,
}

impl InMemoryGuildSettingsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GuildSettingsRepository for InMemoryGuildSettingsRepository {
    async fn load(&self, guild_id: Id<GuildMarker>) -> Result<GuildSettings, Error> {
        Ok(self
            .settings
            .get(&guild_id)
            .map(|s| s.value().clone())
            .unwrap_or_default())
    }

    async fn save(&self, guild_id: Id<GuildMarker>, settings: &GuildSettings) -> Result<(), Error> {
        self.settings.insert(guild_id, settings.clone());
        Ok(())
    }
}
