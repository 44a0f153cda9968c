// modslash-core/src/services/discord/context_menu.rs
//
// Right-click "Kick User" / "Ban User" / "Mute User" / "Deafen User" entries.
// Registered only on the full surface.

use tracing::debug;
use twilight_model::application::command::{Command, CommandType};
use twilight_model::application::interaction::InteractionContextType;
use twilight_model::application::interaction::application_command::CommandData;
use twilight_model::id::Id;
use twilight_model::id::marker::{GuildMarker, UserMarker};
use twilight_util::builder::command::CommandBuilder;

use modslash_common::models::{CommandSurface, ModerationAction};
use modslash_common::traits::platform_traits::Responder;

use crate::Error;
use crate::services::discord::DiscordCommandContext;
use crate::services::moderation::{ModerationInvocation, messages};

pub fn create_context_menu_commands() -> Vec<Command> {
    ModerationAction::ALL
        .into_iter()
        .filter_map(|action| {
            action.context_menu_label().map(|label| {
                // User commands must have an empty description.
                CommandBuilder::new(label, "", CommandType::User)
                    .default_member_permissions(action.default_permissions())
                    .contexts([InteractionContextType::Guild])
                    .build()
            })
        })
        .collect()
}

pub async fn handle(
    ctx: &DiscordCommandContext,
    guild_id: Id<GuildMarker>,
    actor_id: Id<UserMarker>,
    data: &CommandData,
    responder: &dyn Responder,
) -> Result<(), Error> {
    let Some(action) = ModerationAction::from_context_menu_label(&data.name) else {
        return responder
            .reply(&format!("Unrecognized command: {}", data.name))
            .await;
    };
    let Some(target) = data.target_id else {
        let e = Error::Parse(format!("'{}' invoked without a target", data.name));
        return responder.reply(&messages::unexpected(&e)).await;
    };
    let target_id = target.cast::<UserMarker>();

    let outcome = ctx
        .service
        .moderate(
            ModerationInvocation {
                guild_id,
                actor_id,
                target_id,
                action,
                reason: None,
                surface: CommandSurface::ContextMenu,
            },
            responder,
        )
        .await?;
    debug!("'{}' by {actor_id} in guild {guild_id}: {outcome:?}", data.name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use twilight_model::guild::Permissions;

    #[test]
    fn context_menu_entries_are_user_commands() {
        let commands = create_context_menu_commands();
        assert_eq!(commands.len(), 4);
        for cmd in &commands {
            assert_eq!(cmd.kind, CommandType::User);
            assert!(cmd.description.is_empty());
            assert!(cmd.options.is_empty());
            assert_eq!(cmd.contexts, Some(vec![InteractionContextType::Guild]));
        }
        let ban = commands.iter().find(|c| c.name == "Ban User").unwrap();
        assert_eq!(ban.default_member_permissions, Some(Permissions::BAN_MEMBERS));
    }
}
