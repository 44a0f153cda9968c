use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

use twilight_cache_inmemory::{InMemoryCache, ResourceType};
use twilight_gateway::{
    self as gateway, CloseFrame, Config, Event, EventTypeFlags, Intents, MessageSender, Shard,
    StreamExt,
};
use twilight_http::client::ClientBuilder;
use twilight_model::oauth::Application;
use twilight_model::id::Id;
use twilight_model::id::marker::UserMarker;

use modslash_common::traits::repository_traits::GuildSettingsRepository;

use crate::Error;
use crate::config::{CommandSurfaceMode, ModSlashConfig};
use crate::platforms::discord::{TwilightMemberDirectory, TwilightMemberModerator};
use crate::services::ModerationService;
use crate::services::discord::{DiscordCommandContext, prefix, slashcommands};

pub fn gateway_intents(surface: CommandSurfaceMode) -> Intents {
    let mut intents = Intents::GUILDS | Intents::GUILD_MEMBERS | Intents::GUILD_VOICE_STATES;
    if surface.prefix_commands() {
        intents |= Intents::GUILD_MESSAGES | Intents::MESSAGE_CONTENT;
    }
    intents
}

/// Each shard updates the shared cache and hands commands to their own task, so a
/// slow HTTP call never holds up the gateway.
async fn shard_runner(mut shard: Shard, cache: Arc<InMemoryCache>, ctx: DiscordCommandContext) {
    let shard_id = shard.id().number();
    info!("(ShardRunner) Shard {shard_id} started. Listening for events.");

    while let Some(item) = shard.next_event(EventTypeFlags::all()).await {
        let event = match item {
            Ok(event) => event,
            Err(err) => {
                error!("Shard {shard_id} => error receiving event: {err:?}");
                continue;
            }
        };
        cache.update(&event);

        match event {
            Event::Ready(ready) => {
                info!(
                    "Shard {shard_id} => READY as {} (ID={}) in {} guilds",
                    ready.user.name,
                    ready.user.id,
                    ready.guilds.len()
                );
                if ctx.claim_registration() {
                    let ctx = ctx.clone();
                    tokio::spawn(async move {
                        if let Err(e) = slashcommands::register_commands(&ctx).await {
                            error!("Command registration failed: {e}");
                        }
                    });
                }
            }
            Event::InteractionCreate(interaction) => {
                let ctx = ctx.clone();
                tokio::spawn(async move {
                    if let Err(e) = slashcommands::handle_interaction_create(&ctx, &interaction.0).await {
                        error!("Error handling interaction {}: {e}", interaction.id);
                    }
                });
            }
            Event::MessageCreate(message) if ctx.surface.prefix_commands() => {
                let ctx = ctx.clone();
                tokio::spawn(async move {
                    if let Err(e) = prefix::handle_message(&ctx, &message.0).await {
                        error!("Error handling prefix command in {}: {e}", message.channel_id);
                    }
                });
            }
            other => {
                trace!("Shard {shard_id} => unhandled event: {:?}", other.kind());
            }
        }
    }

    warn!("(ShardRunner) Shard {shard_id} event loop ended.");
}

pub struct DiscordPlatform {
    config: ModSlashConfig,
    shard_tasks: Vec<JoinHandle<()>>,
    shard_senders: Vec<MessageSender>,
}

impl DiscordPlatform {
    pub fn new(config: ModSlashConfig) -> Self {
        Self {
            config,
            shard_tasks: Vec::new(),
            shard_senders: Vec::new(),
        }
    }

    /// Owners are the application owner, or every team member when the
    /// application belongs to a team, plus the configured extra ids.
    fn owner_ids(&self, application: &Application) -> HashSet<Id<UserMarker>> {
        let mut owners: HashSet<Id<UserMarker>> =
            self.config.extra_owner_ids.iter().copied().collect();
        match &application.team {
            Some(team) => owners.extend(team.members.iter().map(|m| m.user.id)),
            None => owners.extend(application.owner.as_ref().map(|o| o.id)),
        }
        debug!("Resolved {} bot owner(s)", owners.len());
        owners
    }

    pub async fn connect(
        &mut self,
        settings_repo: Arc<dyn GuildSettingsRepository>,
    ) -> Result<(), Error> {
        if !self.shard_tasks.is_empty() {
            info!("(DiscordPlatform) Already connected => skipping");
            return Ok(());
        }

        let http = Arc::new(
            ClientBuilder::new()
                .token(self.config.token.clone())
                .timeout(Duration::from_secs(30))
                .build(),
        );

        let current_user = http
            .current_user()
            .await
            .map_err(|e| Error::Platform(format!("Failed to fetch current user: {e}")))?
            .model()
            .await
            .map_err(|e| Error::Platform(format!("Failed to parse current user: {e}")))?;
        let application = http
            .current_user_application()
            .await
            .map_err(|e| Error::Platform(format!("Failed to fetch application: {e}")))?
            .model()
            .await
            .map_err(|e| Error::Platform(format!("Failed to parse application: {e}")))?;
        let owners = self.owner_ids(&application);

        let cache = Arc::new(
            InMemoryCache::builder()
                .resource_types(
                    ResourceType::GUILD
                        | ResourceType::ROLE
                        | ResourceType::MEMBER
                        | ResourceType::USER
                        | ResourceType::VOICE_STATE,
                )
                .build(),
        );

        let directory = Arc::new(TwilightMemberDirectory::new(
            http.clone(),
            cache.clone(),
            owners,
            current_user.id,
        ));
        let moderator = Arc::new(TwilightMemberModerator::new(http.clone()));
        let service = Arc::new(ModerationService::new(
            settings_repo,
            directory.clone(),
            moderator,
        ));
        let ctx = DiscordCommandContext::new(
            http.clone(),
            application.id,
            service,
            directory,
            self.config.surface,
            &self.config.prefix,
            self.config.register_guild,
        );

        let gateway_config = Config::new(
            self.config.token.clone(),
            gateway_intents(self.config.surface),
        );
        let shards = gateway::create_recommended(&http, gateway_config, |_, b| b.build())
            .await
            .map_err(|e| Error::Platform(format!("create_recommended error: {e}")))?;

        for shard in shards {
            self.shard_senders.push(shard.sender());
            let handle = tokio::spawn(shard_runner(shard, cache.clone(), ctx.clone()));
            self.shard_tasks.push(handle);
        }

        info!(
            "(DiscordPlatform) Connected as {} with {} shard(s), surface={}",
            current_user.name,
            self.shard_tasks.len(),
            self.config.surface
        );
        Ok(())
    }

    pub async fn disconnect(&mut self) -> Result<(), Error> {
        for sender in &self.shard_senders {
            let _ = sender.close(CloseFrame::NORMAL);
        }
        for task in self.shard_tasks.drain(..) {
            if let Err(e) = task.await {
                warn!("Shard task ended abnormally: {e}");
            }
        }
        self.shard_senders.clear();
        info!("(DiscordPlatform) Disconnected");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_intents_only_for_prefix_commands() {
        let slash = gateway_intents(CommandSurfaceMode::Slash);
        assert!(slash.contains(Intents::GUILD_VOICE_STATES | Intents::GUILD_MEMBERS));
        assert!(!slash.contains(Intents::MESSAGE_CONTENT));

        let full = gateway_intents(CommandSurfaceMode::Full);
        assert!(full.contains(Intents::MESSAGE_CONTENT | Intents::GUILD_MESSAGES));
    }
}
