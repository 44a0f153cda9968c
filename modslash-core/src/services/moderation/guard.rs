// Authorization guard: who may invoke moderation commands at all.

use tracing::warn;

use modslash_common::models::{GuildModerationConfig, Principal};
use modslash_common::traits::platform_traits::Responder;

use crate::Error;
use crate::services::moderation::messages;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// The guild has no moderator roles at all. Treated as a denial, not a setup state.
    NoRolesConfigured,
    MissingModRole,
}

impl Denial {
    pub fn message(self) -> &'static str {
        match self {
            Denial::NoRolesConfigured => messages::NO_ROLES_CONFIGURED,
            Denial::MissingModRole => messages::MISSING_MOD_ROLE,
        }
    }
}

/// Pure decision: owners always pass, otherwise one configured role is required.
pub fn check(actor: &Principal, config: &GuildModerationConfig) -> Result<(), Denial> {
    if actor.is_owner {
        return Ok(());
    }
    if config.is_empty() {
        return Err(Denial::NoRolesConfigured);
    }
    if actor.has_any_role(&config.mod_roles) {
        Ok(())
    } else {
        Err(Denial::MissingModRole)
    }
}

/// Runs [`check`] and, on denial, sends the one notice the invoker gets.
/// Callers must not reply again after a `false`.
pub async fn authorize(
    actor: &Principal,
    config: &GuildModerationConfig,
    responder: &dyn Responder,
) -> Result<bool, Error> {
    match check(actor, config) {
        Ok(()) => Ok(true),
        Err(denial) => {
            warn!(
                "Denied moderation command for user {} in guild {}: {denial:?}",
                actor.id, config.guild_id
            );
            responder.reply(denial.message()).await?;
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use twilight_model::id::Id;

    fn actor(is_owner: bool, roles: &[u64]) -> Principal {
        Principal {
            id: Id::new(1),
            name: "actor".into(),
            display_name: "actor".into(),
            is_owner,
            role_ids: roles.iter().copied().map(Id::new).collect(),
            highest_role_rank: 1,
        }
    }

    fn config(roles: &[u64]) -> GuildModerationConfig {
        GuildModerationConfig {
            guild_id: Id::new(99),
            mod_roles: roles.iter().copied().map(Id::new).collect(),
        }
    }

    #[test]
    fn owner_passes_regardless_of_configuration() {
        assert_eq!(check(&actor(true, &[]), &config(&[])), Ok(()));
        assert_eq!(check(&actor(true, &[5]), &config(&[7])), Ok(()));
    }

    #[test]
    fn empty_configuration_fails_closed() {
        assert_eq!(check(&actor(false, &[5]), &config(&[])), Err(Denial::NoRolesConfigured));
    }

    #[test]
    fn any_shared_role_is_enough() {
        assert_eq!(check(&actor(false, &[3, 5]), &config(&[5, 8])), Ok(()));
        assert_eq!(check(&actor(false, &[3]), &config(&[5, 8])), Err(Denial::MissingModRole));
    }
}
