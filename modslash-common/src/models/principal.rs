use twilight_model::id::Id;
use twilight_model::id::marker::{RoleMarker, UserMarker};

/// A user as known within one guild at the moment a command is handled.
///
/// Built fresh for every invocation from the live gateway cache (or HTTP when the
/// cache has not seen the member yet), so rank comparisons always reflect the
/// current role layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: Id<UserMarker>,
    /// Account username, used in audit log reasons.
    pub name: String,
    /// Server nickname, falling back to global display name, then username.
    pub display_name: String,
    /// Bot owner (application owner, team member, or configured extra owner).
    pub is_owner: bool,
    pub role_ids: Vec<Id<RoleMarker>>,
    /// Position of the member's highest role; 0 when only @everyone is held.
    pub highest_role_rank: i64,
}

impl Principal {
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }

    pub fn has_any_role(&self, roles: &[Id<RoleMarker>]) -> bool {
        self.role_ids.iter().any(|r| roles.contains(r))
    }
}

/// The members one moderation command involves, resolved together so they are
/// ranked against the same role layout. `None` means not a member of the guild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationParties {
    pub actor: Option<Principal>,
    pub target: Option<Principal>,
    pub bot: Option<Principal>,
}
