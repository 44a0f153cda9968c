// File: modslash-core/src/services/discord/slashcommands/modslashset.rs

use twilight_model::application::command::{Command, CommandType};
use twilight_model::application::interaction::{Interaction, InteractionContextType};
use twilight_model::application::interaction::application_command::{
    CommandData, CommandDataOption, CommandOptionValue,
};
use twilight_model::guild::Permissions;
use twilight_model::id::Id;
use twilight_model::id::marker::GuildMarker;
use twilight_util::builder::command::{CommandBuilder, RoleBuilder, SubCommandBuilder};

use modslash_common::traits::platform_traits::Responder;

use crate::Error;
use crate::services::discord::DiscordCommandContext;
use crate::services::moderation::{ConfigCommand, messages};

pub const COMMAND_NAME: &str = "modslashset";

pub fn create_modslashset_command() -> Command {
    CommandBuilder::new(
        COMMAND_NAME,
        "Configuration for ModSlash commands",
        CommandType::ChatInput,
    )
        .default_member_permissions(Permissions::MANAGE_GUILD)
        .contexts([InteractionContextType::Guild])
        .option(
            SubCommandBuilder::new("addrole", "Adds a role that can use ModSlash commands.")
                .option(RoleBuilder::new("role", "The role to add.").required(true)),
        )
        .option(
            SubCommandBuilder::new("removerole", "Removes a role from the ModSlash moderators.")
                .option(RoleBuilder::new("role", "The role to remove.").required(true)),
        )
        .option(SubCommandBuilder::new(
            "listroles",
            "Lists the roles that can use ModSlash commands.",
        ))
        .build()
}

/// Maps the invoked subcommand onto a [`ConfigCommand`].
pub fn parse_subcommand(options: &[CommandDataOption]) -> Result<ConfigCommand, Error> {
    let sub = options
        .first()
        .ok_or_else(|| Error::Parse("missing modslashset subcommand".into()))?;
    let CommandOptionValue::SubCommand(sub_options) = &sub.value else {
        return Err(Error::Parse(format!("'{}' is not a subcommand", sub.name)));
    };

    let role = sub_options.iter().find_map(|o| match (o.name.as_str(), &o.value) {
        ("role", CommandOptionValue::Role(id)) => Some(*id),
        _ => None,
    });

    match (sub.name.as_str(), role) {
        ("addrole", Some(role_id)) => Ok(ConfigCommand::AddRole(role_id)),
        ("removerole", Some(role_id)) => Ok(ConfigCommand::RemoveRole(role_id)),
        ("listroles", _) => Ok(ConfigCommand::ListRoles),
        (name, _) => Err(Error::Parse(format!("invalid modslashset subcommand: {name}"))),
    }
}

/// Discord attaches the invoker's resolved guild permissions to slash interactions.
/// A member without them is treated as holding none.
pub fn invoker_permissions(attached: Option<Permissions>) -> Permissions {
    attached.unwrap_or_else(Permissions::empty)
}

pub async fn handle(
    ctx: &DiscordCommandContext,
    guild_id: Id<GuildMarker>,
    interaction: &Interaction,
    data: &CommandData,
    responder: &dyn Responder,
) -> Result<(), Error> {
    let command = match parse_subcommand(&data.options) {
        Ok(command) => command,
        Err(e) => return responder.reply(&messages::unexpected(&e)).await,
    };
    let permissions = invoker_permissions(interaction.member.as_ref().and_then(|m| m.permissions));

    ctx.service
        .configure(guild_id, permissions, command, responder)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(name: &str, options: Vec<CommandDataOption>) -> Vec<CommandDataOption> {
        vec![CommandDataOption {
            name: name.into(),
            value: CommandOptionValue::SubCommand(options),
        }]
    }

    fn role_option(id: u64) -> CommandDataOption {
        CommandDataOption {
            name: "role".into(),
            value: CommandOptionValue::Role(Id::new(id)),
        }
    }

    #[test]
    fn parses_each_subcommand() {
        assert_eq!(
            parse_subcommand(&sub("addrole", vec![role_option(7)])).unwrap(),
            ConfigCommand::AddRole(Id::new(7))
        );
        assert_eq!(
            parse_subcommand(&sub("removerole", vec![role_option(8)])).unwrap(),
            ConfigCommand::RemoveRole(Id::new(8))
        );
        assert_eq!(
            parse_subcommand(&sub("listroles", Vec::new())).unwrap(),
            ConfigCommand::ListRoles
        );
    }

    #[test]
    fn addrole_without_role_is_rejected() {
        assert!(parse_subcommand(&sub("addrole", Vec::new())).is_err());
        assert!(parse_subcommand(&[]).is_err());
    }

    #[test]
    fn missing_member_permissions_grant_nothing() {
        assert_eq!(invoker_permissions(None), Permissions::empty());
        assert_eq!(
            invoker_permissions(Some(Permissions::MANAGE_GUILD)),
            Permissions::MANAGE_GUILD
        );
    }

    #[test]
    fn command_has_three_subcommands() {
        let cmd = create_modslashset_command();
        let names: Vec<&str> = cmd.options.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["addrole", "removerole", "listroles"]);
        assert_eq!(cmd.default_member_permissions, Some(Permissions::MANAGE_GUILD));
        assert_eq!(cmd.contexts, Some(vec![InteractionContextType::Guild]));
    }
}
