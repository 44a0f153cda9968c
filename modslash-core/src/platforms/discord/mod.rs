pub mod directory;
pub mod moderator;
pub mod runtime;

pub use directory::TwilightMemberDirectory;
pub use moderator::TwilightMemberModerator;
pub use runtime::DiscordPlatform;
