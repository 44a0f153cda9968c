// File: modslash-core/tests/config_store_tests.rs

mod test_utils;

use std::sync::Arc;

use async_trait::async_trait;
use mockall::mock;
use twilight_model::guild::Permissions;
use twilight_model::id::Id;
use twilight_model::id::marker::GuildMarker;

use modslash_common::models::GuildSettings;
use modslash_common::traits::repository_traits::GuildSettingsRepository;
use modslash_core::Error;
use modslash_core::repositories::InMemoryGuildSettingsRepository;
use modslash_core::services::moderation::{
    AddRoleOutcome, ConfigCommand, ModRoleStore, RemoveRoleOutcome, messages,
};

use test_utils::*;

mock! {
    SettingsRepo {}
    #[async_trait]
    impl GuildSettingsRepository for SettingsRepo {
        async fn load(&self, guild_id: Id<GuildMarker>) -> Result<GuildSettings, Error>;
        async fn save(&self, guild_id: Id<GuildMarker>, settings: &GuildSettings) -> Result<(), Error>;
    }
}

fn store() -> ModRoleStore {
    ModRoleStore::new(Arc::new(InMemoryGuildSettingsRepository::new()))
}

#[tokio::test]
async fn adding_twice_is_idempotent() {
    let store = store();
    assert_eq!(store.add_role(guild(), role(5)).await.unwrap(), AddRoleOutcome::Added);
    assert_eq!(
        store.add_role(guild(), role(5)).await.unwrap(),
        AddRoleOutcome::AlreadyPresent
    );
    assert_eq!(store.list_roles(guild()).await.unwrap(), vec![role(5)]);
}

#[tokio::test]
async fn removing_absent_role_changes_nothing() {
    let store = store();
    store.add_role(guild(), role(5)).await.unwrap();
    assert_eq!(
        store.remove_role(guild(), role(6)).await.unwrap(),
        RemoveRoleOutcome::NotPresent
    );
    assert_eq!(
        store.remove_role(guild(), role(5)).await.unwrap(),
        RemoveRoleOutcome::Removed
    );
    assert!(store.list_roles(guild()).await.unwrap().is_empty());
}

#[tokio::test]
async fn roles_are_listed_in_insertion_order() {
    let store = store();
    for id in [30, 10, 20] {
        store.add_role(guild(), role(id)).await.unwrap();
    }
    assert_eq!(
        store.list_roles(guild()).await.unwrap(),
        vec![role(30), role(10), role(20)]
    );
}

#[tokio::test]
async fn guilds_do_not_share_configuration() {
    let store = store();
    store.add_role(guild(), role(5)).await.unwrap();
    let other: Id<GuildMarker> = Id::new(2000);
    assert!(store.list_roles(other).await.unwrap().is_empty());
    assert!(store.config(other).await.unwrap().is_empty());
}

#[tokio::test]
async fn concurrent_adds_are_not_lost() {
    let store = Arc::new(store());
    let handles: Vec<_> = (1..=25)
        .map(|id| {
            let store = store.clone();
            tokio::spawn(async move { store.add_role(guild(), role(id)).await })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), AddRoleOutcome::Added);
    }

    let mut roles = store.list_roles(guild()).await.unwrap();
    roles.sort();
    assert_eq!(roles, (1..=25).map(role).collect::<Vec<_>>());
}

#[tokio::test]
async fn existing_role_is_not_saved_again() {
    let mut repo = MockSettingsRepo::new();
    repo.expect_load().returning(|_| {
        Ok(GuildSettings {
            mod_roles: vec![role(5)],
        })
    });
    repo.expect_save().times(0);

    let store = ModRoleStore::new(Arc::new(repo));
    assert_eq!(
        store.add_role(guild(), role(5)).await.unwrap(),
        AddRoleOutcome::AlreadyPresent
    );
}

mod configure {
    use super::*;
    use modslash_core::services::moderation::ModerationService;

    mock! {
        Moderator {}
        #[async_trait]
        impl modslash_common::traits::platform_traits::MemberModerator for Moderator {
            async fn kick(&self, guild_id: Id<GuildMarker>, user_id: Id<twilight_model::id::marker::UserMarker>, audit_reason: &str) -> Result<(), modslash_common::models::ModerationFailure>;
            async fn ban(&self, guild_id: Id<GuildMarker>, user_id: Id<twilight_model::id::marker::UserMarker>, audit_reason: &str) -> Result<(), modslash_common::models::ModerationFailure>;
            async fn update_voice_state(&self, guild_id: Id<GuildMarker>, user_id: Id<twilight_model::id::marker::UserMarker>, change: modslash_common::models::VoiceStateChange, audit_reason: &str) -> Result<(), modslash_common::models::ModerationFailure>;
        }
    }

    fn service() -> ModerationService {
        ModerationService::new(
            Arc::new(InMemoryGuildSettingsRepository::new()),
            Arc::new(StaticDirectory::new(10)),
            Arc::new(MockModerator::new()),
        )
    }

    #[tokio::test]
    async fn requires_manage_guild() {
        let service = service();
        let responder = RecordingResponder::new();
        service
            .configure(
                guild(),
                Permissions::KICK_MEMBERS | Permissions::BAN_MEMBERS,
                ConfigCommand::AddRole(role(5)),
                &responder,
            )
            .await
            .unwrap();

        assert_eq!(responder.single(), messages::MISSING_MANAGE_GUILD);
        assert!(service.store().list_roles(guild()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn add_list_remove_replies() {
        let service = service();

        let responder = RecordingResponder::new();
        service
            .configure(guild(), Permissions::MANAGE_GUILD, ConfigCommand::AddRole(role(5)), &responder)
            .await
            .unwrap();
        assert_eq!(responder.single(), "<@&5> has been added as a moderator role.");

        let responder = RecordingResponder::new();
        service
            .configure(guild(), Permissions::ADMINISTRATOR, ConfigCommand::AddRole(role(5)), &responder)
            .await
            .unwrap();
        assert_eq!(responder.single(), "<@&5> is already a moderator role.");

        let responder = RecordingResponder::new();
        service
            .configure(guild(), Permissions::MANAGE_GUILD, ConfigCommand::ListRoles, &responder)
            .await
            .unwrap();
        assert_eq!(responder.single(), "Moderator roles: <@&5>");

        let responder = RecordingResponder::new();
        service
            .configure(guild(), Permissions::MANAGE_GUILD, ConfigCommand::RemoveRole(role(5)), &responder)
            .await
            .unwrap();
        assert_eq!(responder.single(), "<@&5> has been removed from the moderator roles.");

        let responder = RecordingResponder::new();
        service
            .configure(guild(), Permissions::MANAGE_GUILD, ConfigCommand::RemoveRole(role(5)), &responder)
            .await
            .unwrap();
        assert_eq!(responder.single(), messages::role_not_present(role(5)));
        assert_eq!(responder.single(), "<@&5> is not a moderator role.");

        let responder = RecordingResponder::new();
        service
            .configure(guild(), Permissions::MANAGE_GUILD, ConfigCommand::ListRoles, &responder)
            .await
            .unwrap();
        assert_eq!(responder.single(), messages::EMPTY_ROLE_LIST);
    }
}
