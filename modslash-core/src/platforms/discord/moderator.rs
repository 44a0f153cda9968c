// modslash-core/src/platforms/discord/moderator.rs
//
// Member mutations over the Discord REST API. A 403 from Discord means the bot is
// missing a permission (or the role hierarchy blocks it server side) and is reported
// as `PermissionDenied`; every other failure keeps its description.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use twilight_http::Client as HttpClient;
use twilight_http::error::ErrorType;
use twilight_http::request::AuditLogReason;
use twilight_model::id::Id;
use twilight_model::id::marker::{GuildMarker, UserMarker};

use modslash_common::models::{ModerationFailure, VoiceStateChange};
use modslash_common::traits::platform_traits::MemberModerator;

/// Discord rejects audit log reasons longer than this many characters.
pub const AUDIT_REASON_MAX_CHARS: usize = 512;

pub struct TwilightMemberModerator {
    http: Arc<HttpClient>,
}

impl TwilightMemberModerator {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }
}

pub fn truncate_reason(reason: &str) -> &str {
    match reason.char_indices().nth(AUDIT_REASON_MAX_CHARS) {
        Some((idx, _)) => &reason[..idx],
        None => reason,
    }
}

fn classify(error: twilight_http::Error) -> ModerationFailure {
    if let ErrorType::Response { status, .. } = error.kind() {
        if status.get() == 403 {
            return ModerationFailure::PermissionDenied;
        }
    }
    ModerationFailure::Platform(error.to_string())
}

#[async_trait]
impl MemberModerator for TwilightMemberModerator {
    async fn kick(
        &self,
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
        audit_reason: &str,
    ) -> Result<(), ModerationFailure> {
        debug!("Removing member {user_id} from guild {guild_id}");
        self.http
            .remove_guild_member(guild_id, user_id)
            .reason(truncate_reason(audit_reason))
            .await
            .map(|_| ())
            .map_err(classify)
    }

    async fn ban(
        &self,
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
        audit_reason: &str,
    ) -> Result<(), ModerationFailure> {
        debug!("Banning member {user_id} from guild {guild_id}");
        self.http
            .create_ban(guild_id, user_id)
            .reason(truncate_reason(audit_reason))
            .await
            .map(|_| ())
            .map_err(classify)
    }

    async fn update_voice_state(
        &self,
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
        change: VoiceStateChange,
        audit_reason: &str,
    ) -> Result<(), ModerationFailure> {
        debug!("Updating voice state of {user_id} in guild {guild_id}: {change:?}");
        let mut request = self.http.update_guild_member(guild_id, user_id);
        if let Some(mute) = change.mute {
            request = request.mute(mute);
        }
        if let Some(deafen) = change.deafen {
            request = request.deaf(deafen);
        }
        request
            .reason(truncate_reason(audit_reason))
            .await
            .map(|_| ())
            .map_err(classify)
    }
}
