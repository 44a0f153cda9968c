// modslash-core/src/services/discord/prefix.rs
//
// Text prefix commands (`!kick @member reason`, `!modslashset addrole @role`, ...),
// available on the full surface. Same semantics as the slash commands; replies go
// to the channel because text messages cannot be answered ephemerally.

use tracing::{debug, error, warn};
use twilight_model::channel::Message;
use twilight_model::id::Id;
use twilight_model::id::marker::{GuildMarker, RoleMarker, UserMarker};

use modslash_common::models::{CommandSurface, ModerationAction};
use modslash_common::traits::platform_traits::Responder;

use crate::Error;
use crate::services::discord::DiscordCommandContext;
use crate::services::discord::responder::ChannelResponder;
use crate::services::discord::slashcommands::modslashset::COMMAND_NAME as MODSLASHSET;
use crate::services::moderation::{ConfigCommand, ModerationInvocation, can_configure, messages};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefixCommand {
    Moderate {
        action: ModerationAction,
        target_id: Id<UserMarker>,
        reason: Option<String>,
    },
    Configure(ConfigCommand),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefixParse {
    NotACommand,
    Command(PrefixCommand),
    /// A known command with bad arguments. `config` marks `modslashset` usage.
    Usage { usage: String, config: bool },
}

/// Accepts `<@123>`, `<@!123>` or a bare id.
pub fn parse_user_ref(raw: &str) -> Option<Id<UserMarker>> {
    let inner = raw
        .strip_prefix("<@")
        .and_then(|s| s.strip_suffix('>'))
        .map(|s| s.trim_start_matches('!'))
        .unwrap_or(raw);
    inner.parse::<u64>().ok().and_then(Id::new_checked)
}

/// Accepts `<@&123>` or a bare id.
pub fn parse_role_ref(raw: &str) -> Option<Id<RoleMarker>> {
    let inner = raw
        .strip_prefix("<@&")
        .and_then(|s| s.strip_suffix('>'))
        .unwrap_or(raw);
    inner.parse::<u64>().ok().and_then(Id::new_checked)
}

pub fn parse(prefix: &str, content: &str) -> PrefixParse {
    let Some(rest) = content.trim().strip_prefix(prefix) else {
        return PrefixParse::NotACommand;
    };
    let mut parts = rest.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default().to_ascii_lowercase();
    let args = parts.next().unwrap_or_default().trim();

    if name == MODSLASHSET {
        return parse_modslashset(prefix, args);
    }
    let Ok(action) = name.parse::<ModerationAction>() else {
        return PrefixParse::NotACommand;
    };

    let mut args = args.splitn(2, char::is_whitespace);
    let Some(target_id) = args.next().and_then(parse_user_ref) else {
        return PrefixParse::Usage {
            usage: moderation_usage(prefix, action),
            config: false,
        };
    };
    let reason = args
        .next()
        .map(str::trim)
        .filter(|r| !r.is_empty() && action.accepts_reason())
        .map(str::to_string);

    PrefixParse::Command(PrefixCommand::Moderate {
        action,
        target_id,
        reason,
    })
}

fn parse_modslashset(prefix: &str, args: &str) -> PrefixParse {
    let mut words = args.split_whitespace();
    let sub = words.next().map(str::to_ascii_lowercase);
    let role = words.next().and_then(parse_role_ref);

    let command = match (sub.as_deref(), role) {
        (Some("addrole"), Some(role_id)) => ConfigCommand::AddRole(role_id),
        (Some("removerole"), Some(role_id)) => ConfigCommand::RemoveRole(role_id),
        (Some("listroles"), _) => ConfigCommand::ListRoles,
        _ => {
            return PrefixParse::Usage {
                usage: format!(
                    "Usage: {prefix}{MODSLASHSET} addrole <role> | removerole <role> | listroles"
                ),
                config: true,
            };
        }
    };
    PrefixParse::Command(PrefixCommand::Configure(command))
}

fn moderation_usage(prefix: &str, action: ModerationAction) -> String {
    if action.accepts_reason() {
        format!("Usage: {prefix}{action} <member> [reason]")
    } else {
        format!("Usage: {prefix}{action} <member>")
    }
}

/// Usage hints only go to members who could run the command, so malformed
/// commands from everyone else are ignored like ordinary chat.
async fn may_see_usage(
    ctx: &DiscordCommandContext,
    guild_id: Id<GuildMarker>,
    user_id: Id<UserMarker>,
    config: bool,
) -> Result<bool, Error> {
    if config {
        let permissions = ctx.directory.guild_permissions(guild_id, user_id).await?;
        Ok(can_configure(permissions))
    } else {
        ctx.service.may_moderate(guild_id, user_id).await
    }
}

pub async fn handle_message(ctx: &DiscordCommandContext, message: &Message) -> Result<(), Error> {
    if message.author.bot {
        return Ok(());
    }
    let parsed = parse(&ctx.prefix, &message.content);
    if parsed == PrefixParse::NotACommand {
        return Ok(());
    }

    let responder = ChannelResponder::new(ctx.http.clone(), message.channel_id, message.id);
    let Some(guild_id) = message.guild_id else {
        return responder.reply(messages::GUILD_ONLY).await;
    };
    let actor_id = message.author.id;

    let command = match parsed {
        PrefixParse::NotACommand => return Ok(()),
        PrefixParse::Usage { usage, config } => {
            return match may_see_usage(ctx, guild_id, actor_id, config).await {
                Ok(true) => responder.reply(&usage).await,
                Ok(false) => {
                    debug!("Ignoring malformed command from {actor_id} in guild {guild_id}");
                    Ok(())
                }
                Err(e) => {
                    warn!("Could not check whether {actor_id} may see usage: {e}");
                    Ok(())
                }
            };
        }
        PrefixParse::Command(command) => command,
    };

    match command {
        PrefixCommand::Moderate {
            action,
            target_id,
            reason,
        } => {
            let outcome = ctx
                .service
                .moderate(
                    ModerationInvocation {
                        guild_id,
                        actor_id,
                        target_id,
                        action,
                        reason,
                        surface: CommandSurface::Prefix,
                    },
                    &responder,
                )
                .await?;
            debug!("{}{action} by {actor_id} in guild {guild_id}: {outcome:?}", ctx.prefix);
            Ok(())
        }
        PrefixCommand::Configure(command) => {
            let permissions = match ctx.directory.guild_permissions(guild_id, actor_id).await {
                Ok(permissions) => permissions,
                Err(e) => {
                    error!("Could not compute permissions of {actor_id} in guild {guild_id}: {e}");
                    return responder.reply(&messages::unexpected(&e)).await;
                }
            };
            ctx.service
                .configure(guild_id, permissions, command, &responder)
                .await
        }
    }
}
