// modslash-core/src/repositories/mod.rs

pub mod memory;
pub mod postgres;

pub use memory::InMemoryGuildSettingsRepository;
pub use modslash_common::traits::repository_traits::GuildSettingsRepository;
pub use postgres::guild_settings::PostgresGuildSettingsRepository;
