pub mod guild_config;
pub mod moderation;
pub mod principal;

pub use guild_config::{GuildModerationConfig, GuildSettings};
pub use moderation::{
    ActionRequest, CommandSurface, HierarchyViolation, ModerationAction, ModerationFailure,
    VoiceStateChange,
};
pub use principal::{InvocationParties, Principal};
