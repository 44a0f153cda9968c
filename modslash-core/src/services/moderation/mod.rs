// modslash-core/src/services/moderation/mod.rs
//
// Shared core behind every command surface. Adapters translate their input into a
// `ModerationInvocation` or `ConfigCommand` and hand over a `Responder`; everything
// from here on is identical for slash commands, context menus and prefix commands.

pub mod config_store;
pub mod dispatcher;
pub mod guard;
pub mod hierarchy;
pub mod messages;

use std::sync::Arc;

use tracing::{debug, error};
use twilight_model::guild::Permissions;
use twilight_model::id::Id;
use twilight_model::id::marker::{GuildMarker, RoleMarker, UserMarker};

use modslash_common::models::{
    ActionRequest, CommandSurface, GuildModerationConfig, InvocationParties, ModerationAction,
};
use modslash_common::traits::platform_traits::{MemberDirectory, MemberModerator, Responder};
use modslash_common::traits::repository_traits::GuildSettingsRepository;

use crate::Error;
pub use config_store::{AddRoleOutcome, ModRoleStore, RemoveRoleOutcome};
pub use dispatcher::{ActionDispatcher, DispatchOutcome};

/// A moderation command as parsed from any surface, before anything is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationInvocation {
    pub guild_id: Id<GuildMarker>,
    pub actor_id: Id<UserMarker>,
    pub target_id: Id<UserMarker>,
    pub action: ModerationAction,
    pub reason: Option<String>,
    pub surface: CommandSurface,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationOutcome {
    Unauthorized,
    TargetNotFound,
    Dispatched(DispatchOutcome),
    /// Resolution or storage failed; the invoker got a generic error reply.
    Errored,
}

/// `/modslashset` subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigCommand {
    AddRole(Id<RoleMarker>),
    RemoveRole(Id<RoleMarker>),
    ListRoles,
}

/// `/modslashset` needs Manage Server; administrators hold it implicitly.
pub fn can_configure(permissions: Permissions) -> bool {
    permissions.intersects(Permissions::MANAGE_GUILD | Permissions::ADMINISTRATOR)
}

pub struct ModerationService {
    store: ModRoleStore,
    directory: Arc<dyn MemberDirectory>,
    dispatcher: ActionDispatcher,
}

impl ModerationService {
    pub fn new(
        settings_repo: Arc<dyn GuildSettingsRepository>,
        directory: Arc<dyn MemberDirectory>,
        moderator: Arc<dyn MemberModerator>,
    ) -> Self {
        debug!("Initializing ModerationService");
        Self {
            store: ModRoleStore::new(settings_repo),
            dispatcher: ActionDispatcher::new(directory.clone(), moderator),
            directory,
        }
    }

    pub fn store(&self) -> &ModRoleStore {
        &self.store
    }

    /// Runs one moderation command end to end. The invoker receives exactly one reply.
    pub async fn moderate(
        &self,
        invocation: ModerationInvocation,
        responder: &dyn Responder,
    ) -> Result<InvocationOutcome, Error> {
        let guild_id = invocation.guild_id;

        let (parties, config) = match self.resolve(&invocation).await {
            Ok(resolved) => resolved,
            Err(e) => return self.report_error(&invocation, e, responder).await,
        };
        let Some(actor) = parties.actor else {
            let e = Error::NotFound(format!("member {}", invocation.actor_id));
            return self.report_error(&invocation, e, responder).await;
        };
        if !guard::authorize(&actor, &config, responder).await? {
            return Ok(InvocationOutcome::Unauthorized);
        }

        let Some(target) = parties.target else {
            responder.reply(messages::TARGET_NOT_MEMBER).await?;
            return Ok(InvocationOutcome::TargetNotFound);
        };
        let Some(bot) = parties.bot else {
            let e = Error::NotFound(format!("bot member in guild {guild_id}"));
            return self.report_error(&invocation, e, responder).await;
        };

        let request = ActionRequest {
            guild_id,
            action: invocation.action,
            actor,
            target,
            bot,
            reason: invocation.reason,
            surface: invocation.surface,
        };
        let outcome = self.dispatcher.dispatch(&request, responder).await?;
        Ok(InvocationOutcome::Dispatched(outcome))
    }

    /// Whether `user_id` would pass the authorization guard, without replying.
    pub async fn may_moderate(
        &self,
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
    ) -> Result<bool, Error> {
        let Some(actor) = self.directory.principal(guild_id, user_id).await? else {
            return Ok(false);
        };
        let config = self.store.config(guild_id).await?;
        Ok(guard::check(&actor, &config).is_ok())
    }

    async fn resolve(
        &self,
        invocation: &ModerationInvocation,
    ) -> Result<(InvocationParties, GuildModerationConfig), Error> {
        let parties = self
            .directory
            .parties(invocation.guild_id, invocation.actor_id, invocation.target_id)
            .await?;
        let config = self.store.config(invocation.guild_id).await?;
        Ok((parties, config))
    }

    async fn report_error(
        &self,
        invocation: &ModerationInvocation,
        error: Error,
        responder: &dyn Responder,
    ) -> Result<InvocationOutcome, Error> {
        error!(
            "{} in guild {} could not be resolved: {error}",
            invocation.action, invocation.guild_id
        );
        responder.reply(&messages::unexpected(&error)).await?;
        Ok(InvocationOutcome::Errored)
    }

    /// Runs one `/modslashset` subcommand. `invoker_permissions` are the guild
    /// permissions of the member who issued it.
    pub async fn configure(
        &self,
        guild_id: Id<GuildMarker>,
        invoker_permissions: Permissions,
        command: ConfigCommand,
        responder: &dyn Responder,
    ) -> Result<(), Error> {
        if !can_configure(invoker_permissions) {
            responder.reply(messages::MISSING_MANAGE_GUILD).await?;
            return Ok(());
        }

        let reply = match self.run_config_command(guild_id, command).await {
            Ok(text) => text,
            Err(e) => {
                error!("modslashset {command:?} in guild {guild_id} failed: {e}");
                messages::unexpected(&e)
            }
        };
        responder.reply(&reply).await
    }

    async fn run_config_command(
        &self,
        guild_id: Id<GuildMarker>,
        command: ConfigCommand,
    ) -> Result<String, Error> {
        Ok(match command {
            ConfigCommand::AddRole(role_id) => match self.store.add_role(guild_id, role_id).await? {
                AddRoleOutcome::Added => messages::role_added(role_id),
                AddRoleOutcome::AlreadyPresent => messages::role_already_present(role_id),
            },
            ConfigCommand::RemoveRole(role_id) => {
                match self.store.remove_role(guild_id, role_id).await? {
                    RemoveRoleOutcome::Removed => messages::role_removed(role_id),
                    RemoveRoleOutcome::NotPresent => messages::role_not_present(role_id),
                }
            }
            ConfigCommand::ListRoles => messages::role_list(&self.store.list_roles(guild_id).await?),
        })
    }
}
