// modslash-core/src/services/mod.rs

pub mod discord;
pub mod moderation;

pub use moderation::ModerationService;
