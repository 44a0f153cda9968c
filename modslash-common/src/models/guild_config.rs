use serde::{Deserialize, Serialize};
use twilight_model::id::Id;
use twilight_model::id::marker::{GuildMarker, RoleMarker};

/// Persisted per-guild document. Stored as JSON so the on-disk shape stays
/// `{ "mod_roles": [...] }` regardless of the backing store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildSettings {
    #[serde(default)]
    pub mod_roles: Vec<Id<RoleMarker>>,
}

/// Moderator role configuration of one guild, as seen by the authorization guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildModerationConfig {
    pub guild_id: Id<GuildMarker>,
    pub mod_roles: Vec<Id<RoleMarker>>,
}

impl GuildModerationConfig {
    pub fn new(guild_id: Id<GuildMarker>, settings: GuildSettings) -> Self {
        Self {
            guild_id,
            mod_roles: settings.mod_roles,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.mod_roles.is_empty()
    }

    pub fn contains(&self, role_id: Id<RoleMarker>) -> bool {
        self.mod_roles.contains(&role_id)
    }
}
