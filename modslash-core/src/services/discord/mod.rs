// modslash-core/src/services/discord/mod.rs
//
// Registration adapters. Each surface parses its own input and then calls into the
// shared `ModerationService`; none of them makes moderation decisions itself.

pub mod context_menu;
pub mod prefix;
pub mod responder;
pub mod slashcommands;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use twilight_http::Client as HttpClient;
use twilight_model::id::Id;
use twilight_model::id::marker::{ApplicationMarker, GuildMarker};

use crate::config::CommandSurfaceMode;
use crate::platforms::discord::TwilightMemberDirectory;
use crate::services::ModerationService;

/// Everything a command handler needs, cloned into each spawned handler task.
#[derive(Clone)]
pub struct DiscordCommandContext {
    pub http: Arc<HttpClient>,
    pub application_id: Id<ApplicationMarker>,
    pub service: Arc<ModerationService>,
    pub directory: Arc<TwilightMemberDirectory>,
    pub surface: CommandSurfaceMode,
    pub prefix: Arc<str>,
    pub register_guild: Option<Id<GuildMarker>>,
    commands_registered: Arc<AtomicBool>,
}

impl DiscordCommandContext {
    pub fn new(
        http: Arc<HttpClient>,
        application_id: Id<ApplicationMarker>,
        service: Arc<ModerationService>,
        directory: Arc<TwilightMemberDirectory>,
        surface: CommandSurfaceMode,
        prefix: &str,
        register_guild: Option<Id<GuildMarker>>,
    ) -> Self {
        Self {
            http,
            application_id,
            service,
            directory,
            surface,
            prefix: Arc::from(prefix),
            register_guild,
            commands_registered: Arc::new(AtomicBool::new(false)),
        }
    }

    /// True exactly once: for the first shard that becomes ready.
    pub fn claim_registration(&self) -> bool {
        !self.commands_registered.swap(true, Ordering::SeqCst)
    }
}
