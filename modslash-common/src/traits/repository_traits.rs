// ================================================================
// File: modslash-common/src/traits/repository_traits.rs
// ================================================================

use async_trait::async_trait;
use twilight_model::id::Id;
use twilight_model::id::marker::GuildMarker;

use crate::error::Error;
use crate::models::GuildSettings;

/// Storage for per-guild moderation settings.
///
/// Implementations only load and save whole documents; callers that modify the
/// role list must serialize their read-modify-write cycles per guild.
#[async_trait]
pub trait GuildSettingsRepository: Send + Sync {
    /// Returns the stored settings, or the default document if the guild has none yet.
    async fn load(&self, guild_id: Id<GuildMarker>) -> Result<GuildSettings, Error>;
    async fn save(&self, guild_id: Id<GuildMarker>, settings: &GuildSettings) -> Result<(), Error>;
}
