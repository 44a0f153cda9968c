// Per-guild moderator role configuration.
//
// The repository only loads and saves whole documents, so every read-modify-write
// runs under a per-guild async mutex. Different guilds never wait on each other.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::info;
use twilight_model::id::Id;
use twilight_model::id::marker::{GuildMarker, RoleMarker};

use modslash_common::models::GuildModerationConfig;
use modslash_common::traits::repository_traits::GuildSettingsRepository;

use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddRoleOutcome {
    Added,
    AlreadyPresent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveRoleOutcome {
    Removed,
    NotPresent,
}

pub struct ModRoleStore {
    repo: Arc<dyn GuildSettingsRepository>,
    guild_locks: DashMap<Id<GuildMarker>, Arc<Mutex<()>>>,
}

impl ModRoleStore {
    pub fn new(repo: Arc<dyn GuildSettingsRepository>) -> Self {
        Self {
            repo,
            guild_locks: DashMap::new(),
        }
    }

    fn lock_for(&self, guild_id: Id<GuildMarker>) -> Arc<Mutex<()>> {
        self.guild_locks
            .entry(guild_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    pub async fn config(&self, guild_id: Id<GuildMarker>) -> Result<GuildModerationConfig, Error> {
        let settings = self.repo.load(guild_id).await?;
        Ok(GuildModerationConfig::new(guild_id, settings))
    }

    pub async fn add_role(
        &self,
        guild_id: Id<GuildMarker>,
        role_id: Id<RoleMarker>,
    ) -> Result<AddRoleOutcome, Error> {
        let lock = self.lock_for(guild_id);
        let _guard = lock.lock().await;

        let mut settings = self.repo.load(guild_id).await?;
        if settings.mod_roles.contains(&role_id) {
            return Ok(AddRoleOutcome::AlreadyPresent);
        }
        settings.mod_roles.push(role_id);
        self.repo.save(guild_id, &settings).await?;
        info!("Added moderator role {role_id} in guild {guild_id}");
        Ok(AddRoleOutcome::Added)
    }

    pub async fn remove_role(
        &self,
        guild_id: Id<GuildMarker>,
        role_id: Id<RoleMarker>,
    ) -> Result<RemoveRoleOutcome, Error> {
        let lock = self.lock_for(guild_id);
        let _guard = lock.lock().await;

        let mut settings = self.repo.load(guild_id).await?;
        let before = settings.mod_roles.len();
        settings.mod_roles.retain(|r| *r != role_id);
        if settings.mod_roles.len() == before {
            return Ok(RemoveRoleOutcome::NotPresent);
        }
        self.repo.save(guild_id, &settings).await?;
        info!("Removed moderator role {role_id} in guild {guild_id}");
        Ok(RemoveRoleOutcome::Removed)
    }

    pub async fn list_roles(&self, guild_id: Id<GuildMarker>) -> Result<Vec<Id<RoleMarker>>, Error> {
        Ok(self.repo.load(guild_id).await?.mod_roles)
    }
}
