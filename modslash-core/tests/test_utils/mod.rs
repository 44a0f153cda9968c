// File: modslash-core/tests/test_utils/mod.rs
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, GuildMarker, RoleMarker, UserMarker};

use modslash_common::models::Principal;
use modslash_common::traits::platform_traits::{MemberDirectory, Responder};
use modslash_core::Error;

pub const GUILD: u64 = 1000;
pub const BOT: u64 = 999;

pub fn guild() -> Id<GuildMarker> {
    Id::new(GUILD)
}

pub fn principal(id: u64, rank: i64, roles: &[u64]) -> Principal {
    Principal {
        id: Id::new(id),
        name: format!("user{id}"),
        display_name: format!("User {id}"),
        is_owner: false,
        role_ids: roles.iter().copied().map(Id::new).collect(),
        highest_role_rank: rank,
    }
}

pub fn owner(id: u64, rank: i64) -> Principal {
    Principal {
        is_owner: true,
        ..principal(id, rank, &[])
    }
}

/// Captures every reply so tests can assert the invoker got exactly one.
#[derive(Default)]
pub struct RecordingResponder {
    replies: Mutex<Vec<String>>,
}

impl RecordingResponder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replies(&self) -> Vec<String> {
        self.replies.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn single(&self) -> String {
        let replies = self.replies();
        assert_eq!(replies.len(), 1, "expected exactly one reply, got {replies:?}");
        replies[0].clone()
    }
}

#[async_trait]
impl Responder for RecordingResponder {
    async fn reply(&self, content: &str) -> Result<(), Error> {
        self.replies
            .lock()
            .map_err(|e| Error::Platform(e.to_string()))?
            .push(content.to_string());
        Ok(())
    }
}

/// Fixed guild membership: who is a member, and who sits in voice.
pub struct StaticDirectory {
    members: HashMap<Id<UserMarker>, Principal>,
    in_voice: HashSet<Id<UserMarker>>,
    bot: Principal,
}

impl StaticDirectory {
    pub fn new(bot_rank: i64) -> Self {
        Self {
            members: HashMap::new(),
            in_voice: HashSet::new(),
            bot: principal(BOT, bot_rank, &[]),
        }
    }

    pub fn with_member(mut self, member: Principal) -> Self {
        self.members.insert(member.id, member);
        self
    }

    pub fn with_voice(mut self, user_id: u64) -> Self {
        self.in_voice.insert(Id::new(user_id));
        self
    }
}

#[async_trait]
impl MemberDirectory for StaticDirectory {
    async fn principal(
        &self,
        _guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
    ) -> Result<Option<Principal>, Error> {
        Ok(self.members.get(&user_id).cloned())
    }

    async fn bot_principal(&self, _guild_id: Id<GuildMarker>) -> Result<Principal, Error> {
        Ok(self.bot.clone())
    }

    async fn voice_channel(
        &self,
        _guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
    ) -> Result<Option<Id<ChannelMarker>>, Error> {
        Ok(self.in_voice.contains(&user_id).then(|| Id::new(77)))
    }
}

pub fn role(id: u64) -> Id<RoleMarker> {
    Id::new(id)
}
