// ================================================================
// File: modslash-common/src/traits/platform_traits.rs
// ================================================================

use async_trait::async_trait;
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, GuildMarker, UserMarker};

use crate::error::Error;
use crate::models::{InvocationParties, ModerationFailure, Principal, VoiceStateChange};

/// Read access to guild members as the chat platform currently sees them.
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// Resolves a member of the guild, `None` if they are not a member.
    async fn principal(
        &self,
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
    ) -> Result<Option<Principal>, Error>;

    /// The bot's own member in the guild.
    async fn bot_principal(&self, guild_id: Id<GuildMarker>) -> Result<Principal, Error>;

    /// Actor, target and bot of one command. Implementations backed by a remote
    /// API should look the guild's roles up once for all three.
    async fn parties(
        &self,
        guild_id: Id<GuildMarker>,
        actor_id: Id<UserMarker>,
        target_id: Id<UserMarker>,
    ) -> Result<InvocationParties, Error> {
        Ok(InvocationParties {
            actor: self.principal(guild_id, actor_id).await?,
            target: self.principal(guild_id, target_id).await?,
            bot: Some(self.bot_principal(guild_id).await?),
        })
    }

    /// Voice channel the member is connected to, if any.
    async fn voice_channel(
        &self,
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
    ) -> Result<Option<Id<ChannelMarker>>, Error>;
}

/// Membership and voice mutations performed on behalf of a moderator.
#[async_trait]
pub trait MemberModerator: Send + Sync {
    async fn kick(
        &self,
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
        audit_reason: &str,
    ) -> Result<(), ModerationFailure>;

    async fn ban(
        &self,
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
        audit_reason: &str,
    ) -> Result<(), ModerationFailure>;

    /// Writes the given server voice flags in a single request.
    async fn update_voice_state(
        &self,
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
        change: VoiceStateChange,
        audit_reason: &str,
    ) -> Result<(), ModerationFailure>;
}

/// Delivers the single reply of a command invocation to whoever invoked it.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Sends a reply visible only to the invoker where the surface supports it.
    /// Mentions in `content` are rendered but never ping anyone.
    async fn reply(&self, content: &str) -> Result<(), Error>;
}
