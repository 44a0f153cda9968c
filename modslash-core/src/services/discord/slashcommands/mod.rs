// File: modslash-core/src/services/discord/slashcommands/mod.rs

pub mod moderation;
pub mod modslashset;

use tracing::{debug, info, warn};
use twilight_model::application::command::{Command, CommandType};
use twilight_model::application::interaction::{Interaction, InteractionData};

use modslash_common::models::ModerationAction;
use modslash_common::traits::platform_traits::Responder;

use crate::Error;
use crate::config::CommandSurfaceMode;
use crate::services::discord::responder::InteractionResponder;
use crate::services::discord::{DiscordCommandContext, context_menu};
use crate::services::moderation::messages;

/// Every application command for the given surface.
pub fn build_commands(surface: CommandSurfaceMode) -> Vec<Command> {
    let mut commands: Vec<Command> = ModerationAction::ALL
        .into_iter()
        .map(moderation::create_moderation_command)
        .collect();
    commands.push(modslashset::create_modslashset_command());
    if surface.context_menus() {
        commands.extend(context_menu::create_context_menu_commands());
    }
    commands
}

/// Overwrites the application's commands, either globally or in one guild.
pub async fn register_commands(ctx: &DiscordCommandContext) -> Result<(), Error> {
    let commands = build_commands(ctx.surface);
    let client = ctx.http.interaction(ctx.application_id);

    match ctx.register_guild {
        Some(guild_id) => {
            client
                .set_guild_commands(guild_id, &commands)
                .await
                .map_err(|e| Error::Platform(format!("Failed to register guild commands: {e}")))?;
            info!("Registered {} commands in guild {guild_id}", commands.len());
        }
        None => {
            client
                .set_global_commands(&commands)
                .await
                .map_err(|e| Error::Platform(format!("Failed to register global commands: {e}")))?;
            info!("Registered {} global commands", commands.len());
        }
    }
    Ok(())
}

/// Dispatch application commands from an `InteractionCreate`.
pub async fn handle_interaction_create(
    ctx: &DiscordCommandContext,
    interaction: &Interaction,
) -> Result<(), Error> {
    let Some(InteractionData::ApplicationCommand(data)) = &interaction.data else {
        debug!("Ignoring non-command interaction {}", interaction.id);
        return Ok(());
    };

    let responder = InteractionResponder::new(
        ctx.http.clone(),
        interaction.application_id,
        interaction.id,
        interaction.token.clone(),
    );

    let Some(guild_id) = interaction.guild_id else {
        return responder.reply(messages::GUILD_ONLY).await;
    };
    let Some(actor_id) = interaction.author_id() else {
        warn!("Interaction {} has no author", interaction.id);
        return Ok(());
    };

    let name = data.name.as_str();
    match data.kind {
        CommandType::ChatInput if name == modslashset::COMMAND_NAME => {
            modslashset::handle(ctx, guild_id, interaction, data, &responder).await
        }
        CommandType::ChatInput => match name.parse::<ModerationAction>() {
            Ok(action) => {
                moderation::handle(ctx, guild_id, actor_id, action, data, &responder).await
            }
            Err(_) => unrecognized(&responder, name).await,
        },
        CommandType::User if ctx.surface.context_menus() => {
            context_menu::handle(ctx, guild_id, actor_id, data, &responder).await
        }
        _ => unrecognized(&responder, name).await,
    }
}

async fn unrecognized(responder: &dyn Responder, name: &str) -> Result<(), Error> {
    warn!("Unrecognized command: {name}");
    responder.reply(&format!("Unrecognized command: {name}")).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_surface_has_no_context_menus() {
        let commands = build_commands(CommandSurfaceMode::Slash);
        assert_eq!(commands.len(), 9);
        assert!(commands.iter().all(|c| c.kind == CommandType::ChatInput));
    }

    #[test]
    fn full_surface_adds_four_user_commands() {
        let commands = build_commands(CommandSurfaceMode::Full);
        let user_commands: Vec<&str> = commands
            .iter()
            .filter(|c| c.kind == CommandType::User)
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(user_commands, vec!["Kick User", "Ban User", "Mute User", "Deafen User"]);
    }
}
