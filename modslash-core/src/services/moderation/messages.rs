// User-facing reply texts. Every reply of a moderation or configuration command is
// built here so the wording stays identical across slash, context menu and prefix.

use twilight_model::id::Id;
use twilight_model::id::marker::RoleMarker;

use modslash_common::models::{
    ActionRequest, HierarchyViolation, ModerationAction, ModerationFailure, Principal,
};

pub const NO_ROLES_CONFIGURED: &str = "No moderator roles have been configured on this server.";
pub const MISSING_MOD_ROLE: &str = "You do not have the required role to use this command.";
pub const MISSING_MANAGE_GUILD: &str = "You need the Manage Server permission to use this command.";
pub const GUILD_ONLY: &str = "This command can only be used in a server.";
pub const TARGET_NOT_MEMBER: &str = "That user is not a member of this server.";
pub const EMPTY_ROLE_LIST: &str = "No moderator roles are configured.";

pub fn role_mention(role_id: Id<RoleMarker>) -> String {
    format!("<@&{role_id}>")
}

pub fn hierarchy_violation(action: ModerationAction, violation: HierarchyViolation) -> String {
    let verb = action.name();
    match violation {
        HierarchyViolation::SelfTarget => format!("You cannot {verb} yourself."),
        HierarchyViolation::ActorOutranked => {
            format!("You cannot {verb} a member with an equal or higher role.")
        }
        HierarchyViolation::BotOutranked => {
            format!("I cannot {verb} a member with an equal or higher role than me.")
        }
    }
}

pub fn not_in_voice(target: &Principal) -> String {
    format!("{} is not in a voice channel.", target.mention())
}

pub fn success(request: &ActionRequest) -> String {
    let past = request.action.past_tense();
    let mention = request.target.mention();
    if request.echoes_reason() {
        format!("Successfully {past} {mention}. Reason: {}", request.reason_or_default())
    } else {
        format!("Successfully {past} {mention}.")
    }
}

pub fn failure(action: ModerationAction, failure: &ModerationFailure) -> String {
    match failure {
        ModerationFailure::PermissionDenied => format!(
            "I don't have the required permissions to {} this user.",
            action.name()
        ),
        ModerationFailure::Platform(description) => format!("An error occurred: {description}"),
    }
}

pub fn unexpected(error: &impl std::fmt::Display) -> String {
    format!("An error occurred: {error}")
}

pub fn role_added(role_id: Id<RoleMarker>) -> String {
    format!("{} has been added as a moderator role.", role_mention(role_id))
}

pub fn role_already_present(role_id: Id<RoleMarker>) -> String {
    format!("{} is already a moderator role.", role_mention(role_id))
}

pub fn role_removed(role_id: Id<RoleMarker>) -> String {
    format!("{} has been removed from the moderator roles.", role_mention(role_id))
}

pub fn role_not_present(role_id: Id<RoleMarker>) -> String {
    format!("{} is not a moderator role.", role_mention(role_id))
}

pub fn role_list(roles: &[Id<RoleMarker>]) -> String {
    if roles.is_empty() {
        return EMPTY_ROLE_LIST.to_string();
    }
    let mentions: Vec<String> = roles.iter().copied().map(role_mention).collect();
    format!("Moderator roles: {}", mentions.join(", "))
}
