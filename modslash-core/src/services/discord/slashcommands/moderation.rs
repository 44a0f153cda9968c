// File: modslash-core/src/services/discord/slashcommands/moderation.rs

use tracing::debug;
use twilight_model::application::command::{Command, CommandType};
use twilight_model::application::interaction::InteractionContextType;
use twilight_model::application::interaction::application_command::{
    CommandData, CommandDataOption, CommandOptionValue,
};
use twilight_model::id::Id;
use twilight_model::id::marker::{GuildMarker, UserMarker};
use twilight_util::builder::command::{CommandBuilder, StringBuilder, UserBuilder};

use modslash_common::models::{CommandSurface, ModerationAction};
use modslash_common::traits::platform_traits::Responder;

use crate::Error;
use crate::services::discord::DiscordCommandContext;
use crate::services::moderation::{ModerationInvocation, messages};

pub const MEMBER_OPTION: &str = "member";
pub const REASON_OPTION: &str = "reason";

/// `/kick member reason?` and friends. Restoring actions take no reason.
pub fn create_moderation_command(action: ModerationAction) -> Command {
    let verb = action.name();
    let mut builder = CommandBuilder::new(verb, action.description(), CommandType::ChatInput)
        .default_member_permissions(action.default_permissions())
        .contexts([InteractionContextType::Guild])
        .option(UserBuilder::new(MEMBER_OPTION, format!("The user to {verb}.")).required(true));
    if action.accepts_reason() {
        builder = builder.option(StringBuilder::new(
            REASON_OPTION,
            format!("The reason for the {verb}."),
        ));
    }
    builder.build()
}

/// Extracts the target member and optional reason from the command options.
pub fn parse_options(
    options: &[CommandDataOption],
) -> Result<(Id<UserMarker>, Option<String>), Error> {
    let mut member = None;
    let mut reason = None;
    for option in options {
        match (option.name.as_str(), &option.value) {
            (MEMBER_OPTION, CommandOptionValue::User(id)) => member = Some(*id),
            (REASON_OPTION, CommandOptionValue::String(text)) => reason = Some(text.clone()),
            _ => {}
        }
    }
    let member = member.ok_or_else(|| Error::Parse("missing member option".into()))?;
    Ok((member, reason))
}

pub async fn handle(
    ctx: &DiscordCommandContext,
    guild_id: Id<GuildMarker>,
    actor_id: Id<UserMarker>,
    action: ModerationAction,
    data: &CommandData,
    responder: &dyn Responder,
) -> Result<(), Error> {
    let (target_id, reason) = match parse_options(&data.options) {
        Ok(parsed) => parsed,
        Err(e) => return responder.reply(&messages::unexpected(&e)).await,
    };
    let reason = reason.filter(|_| action.accepts_reason());

    let outcome = ctx
        .service
        .moderate(
            ModerationInvocation {
                guild_id,
                actor_id,
                target_id,
                action,
                reason,
                surface: CommandSurface::Slash,
            },
            responder,
        )
        .await?;
    debug!("/{action} by {actor_id} in guild {guild_id}: {outcome:?}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use twilight_model::application::command::CommandOptionType;
    use twilight_model::guild::Permissions;

    #[test]
    fn kick_command_has_required_member_and_optional_reason() {
        let cmd = create_moderation_command(ModerationAction::Kick);
        assert_eq!(cmd.name, "kick");
        assert_eq!(cmd.default_member_permissions, Some(Permissions::KICK_MEMBERS));
        assert_eq!(cmd.options.len(), 2);
        assert_eq!(cmd.contexts, Some(vec![InteractionContextType::Guild]));
        assert_eq!(cmd.options[0].name, MEMBER_OPTION);
        assert_eq!(cmd.options[0].kind, CommandOptionType::User);
        assert_eq!(cmd.options[0].required, Some(true));
        assert_eq!(cmd.options[1].name, REASON_OPTION);
        assert_ne!(cmd.options[1].required, Some(true));
    }

    #[test]
    fn restoring_commands_only_take_member() {
        let cmd = create_moderation_command(ModerationAction::Unsilence);
        assert_eq!(cmd.options.len(), 1);
        assert_eq!(
            cmd.default_member_permissions,
            Some(Permissions::MUTE_MEMBERS | Permissions::DEAFEN_MEMBERS)
        );
    }

    #[test]
    fn options_parse_member_and_reason() {
        let options = vec![
            CommandDataOption {
                name: MEMBER_OPTION.into(),
                value: CommandOptionValue::User(Id::new(55)),
            },
            CommandDataOption {
                name: REASON_OPTION.into(),
                value: CommandOptionValue::String("spamming".into()),
            },
        ];
        let (member, reason) = parse_options(&options).unwrap();
        assert_eq!(member, Id::new(55));
        assert_eq!(reason.as_deref(), Some("spamming"));
    }

    #[test]
    fn missing_member_is_a_parse_error() {
        let options = vec![CommandDataOption {
            name: REASON_OPTION.into(),
            value: CommandOptionValue::String("x".into()),
        }];
        assert!(matches!(parse_options(&options), Err(Error::Parse(_))));
    }
}
