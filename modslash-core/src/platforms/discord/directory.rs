// modslash-core/src/platforms/discord/directory.rs
//
// Resolves guild members into `Principal`s. The gateway cache is consulted first;
// anything it has not seen yet (large guilds, members that never spoke) is fetched
// over HTTP. Nothing resolved here is kept between invocations.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, trace};
use twilight_cache_inmemory::InMemoryCache;
use twilight_http::Client as HttpClient;
use twilight_http::error::ErrorType;
use twilight_model::guild::Permissions;
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, GuildMarker, RoleMarker, UserMarker};

use modslash_common::models::{InvocationParties, Principal};
use modslash_common::traits::platform_traits::MemberDirectory;

use crate::Error;

/// Position and permissions of every role in a guild, keyed by role id.
type RoleTable = HashMap<Id<RoleMarker>, (i64, Permissions)>;

struct MemberSnapshot {
    roles: Vec<Id<RoleMarker>>,
    name: String,
    display_name: String,
}

pub struct TwilightMemberDirectory {
    http: Arc<HttpClient>,
    cache: Arc<InMemoryCache>,
    owners: HashSet<Id<UserMarker>>,
    bot_id: Id<UserMarker>,
}

impl TwilightMemberDirectory {
    pub fn new(
        http: Arc<HttpClient>,
        cache: Arc<InMemoryCache>,
        owners: HashSet<Id<UserMarker>>,
        bot_id: Id<UserMarker>,
    ) -> Self {
        Self {
            http,
            cache,
            owners,
            bot_id,
        }
    }

    /// Guild-level permissions of a member, used to gate `modslashset` prefix commands.
    /// The guild owner and administrators hold every permission.
    pub async fn guild_permissions(
        &self,
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
    ) -> Result<Permissions, Error> {
        if self.guild_owner(guild_id).await? == user_id {
            return Ok(Permissions::all());
        }
        let Some(member) = self.member(guild_id, user_id).await? else {
            return Ok(Permissions::empty());
        };
        let table = self.role_table(guild_id).await?;

        // @everyone shares the guild's id.
        let everyone = guild_id.cast::<RoleMarker>();
        let permissions = std::iter::once(&everyone)
            .chain(member.roles.iter())
            .filter_map(|id| table.get(id))
            .fold(Permissions::empty(), |acc, (_, p)| acc | *p);

        if permissions.contains(Permissions::ADMINISTRATOR) {
            Ok(Permissions::all())
        } else {
            Ok(permissions)
        }
    }

    async fn guild_owner(&self, guild_id: Id<GuildMarker>) -> Result<Id<UserMarker>, Error> {
        if let Some(guild) = self.cache.guild(guild_id) {
            return Ok(guild.owner_id());
        }
        let guild = self
            .http
            .guild(guild_id)
            .await
            .map_err(|e| Error::Platform(format!("Failed to fetch guild {guild_id}: {e}")))?
            .model()
            .await
            .map_err(|e| Error::Platform(format!("Failed to parse guild {guild_id}: {e}")))?;
        Ok(guild.owner_id)
    }

    async fn member(
        &self,
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
    ) -> Result<Option<MemberSnapshot>, Error> {
        if let Some(member) = self.cache.member(guild_id, user_id) {
            if let Some(user) = self.cache.user(user_id) {
                trace!("member {user_id} of guild {guild_id} resolved from cache");
                let display_name = member
                    .nick()
                    .map(str::to_string)
                    .or_else(|| user.global_name.clone())
                    .unwrap_or_else(|| user.name.clone());
                return Ok(Some(MemberSnapshot {
                    roles: member.roles().to_vec(),
                    name: user.name.clone(),
                    display_name,
                }));
            }
        }

        debug!("member {user_id} of guild {guild_id} not cached, fetching");
        let response = match self.http.guild_member(guild_id, user_id).await {
            Ok(response) => response,
            Err(e) if is_not_found(&e) => return Ok(None),
            Err(e) => {
                return Err(Error::Platform(format!(
                    "Failed to fetch member {user_id} of guild {guild_id}: {e}"
                )));
            }
        };
        let member = response
            .model()
            .await
            .map_err(|e| Error::Platform(format!("Failed to parse member {user_id}: {e}")))?;

        let display_name = member
            .nick
            .clone()
            .or_else(|| member.user.global_name.clone())
            .unwrap_or_else(|| member.user.name.clone());
        Ok(Some(MemberSnapshot {
            roles: member.roles,
            name: member.user.name,
            display_name,
        }))
    }

    async fn role_table(&self, guild_id: Id<GuildMarker>) -> Result<RoleTable, Error> {
        if let Some(role_ids) = self.cache.guild_roles(guild_id) {
            let table: RoleTable = role_ids
                .iter()
                .filter_map(|id| {
                    self.cache.role(*id).map(|r| {
                        let role = r.resource();
                        (role.id, (role.position, role.permissions))
                    })
                })
                .collect();
            if table.len() == role_ids.len() {
                return Ok(table);
            }
        }

        debug!("roles of guild {guild_id} not fully cached, fetching");
        let roles = self
            .http
            .roles(guild_id)
            .await
            .map_err(|e| Error::Platform(format!("Failed to fetch roles of guild {guild_id}: {e}")))?
            .models()
            .await
            .map_err(|e| Error::Platform(format!("Failed to parse roles of guild {guild_id}: {e}")))?;
        Ok(roles
            .into_iter()
            .map(|r| (r.id, (r.position, r.permissions)))
            .collect())
    }
}

/// Highest position among the given roles; members without roles rank as @everyone (0).
pub fn highest_rank(roles: &[Id<RoleMarker>], table: &RoleTable) -> i64 {
    roles
        .iter()
        .filter_map(|id| table.get(id).map(|(position, _)| *position))
        .max()
        .unwrap_or(0)
}

fn is_not_found(error: &twilight_http::Error) -> bool {
    matches!(error.kind(), ErrorType::Response { status, .. } if status.get() == 404)
}

impl TwilightMemberDirectory {
    /// Builds a `Principal` ranked against an already resolved role table.
    async fn ranked_principal(
        &self,
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
        table: &RoleTable,
    ) -> Result<Option<Principal>, Error> {
        let Some(member) = self.member(guild_id, user_id).await? else {
            return Ok(None);
        };
        Ok(Some(Principal {
            id: user_id,
            name: member.name,
            display_name: member.display_name,
            is_owner: self.owners.contains(&user_id),
            highest_role_rank: highest_rank(&member.roles, table),
            role_ids: member.roles,
        }))
    }
}

#[async_trait]
impl MemberDirectory for TwilightMemberDirectory {
    async fn principal(
        &self,
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
    ) -> Result<Option<Principal>, Error> {
        let table = self.role_table(guild_id).await?;
        self.ranked_principal(guild_id, user_id, &table).await
    }

    async fn parties(
        &self,
        guild_id: Id<GuildMarker>,
        actor_id: Id<UserMarker>,
        target_id: Id<UserMarker>,
    ) -> Result<InvocationParties, Error> {
        let table = self.role_table(guild_id).await?;
        Ok(InvocationParties {
            actor: self.ranked_principal(guild_id, actor_id, &table).await?,
            target: self.ranked_principal(guild_id, target_id, &table).await?,
            bot: self.ranked_principal(guild_id, self.bot_id, &table).await?,
        })
    }

    async fn bot_principal(&self, guild_id: Id<GuildMarker>) -> Result<Principal, Error> {
        self.principal(guild_id, self.bot_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("bot member in guild {guild_id}")))
    }

    async fn voice_channel(
        &self,
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
    ) -> Result<Option<Id<ChannelMarker>>, Error> {
        Ok(self
            .cache
            .voice_state(user_id, guild_id)
            .map(|state| state.channel_id()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highest_rank_picks_maximum_known_position() {
        let mut table = RoleTable::new();
        table.insert(Id::new(1), (3, Permissions::empty()));
        table.insert(Id::new(2), (9, Permissions::empty()));
        table.insert(Id::new(3), (5, Permissions::KICK_MEMBERS));

        assert_eq!(highest_rank(&[Id::new(1), Id::new(3)], &table), 5);
        assert_eq!(highest_rank(&[Id::new(2), Id::new(1)], &table), 9);
    }

    #[test]
    fn no_roles_rank_as_everyone() {
        let table = RoleTable::new();
        assert_eq!(highest_rank(&[], &table), 0);
        // Unknown role ids are ignored rather than guessed.
        assert_eq!(highest_rank(&[Id::new(42)], &table), 0);
    }
}
