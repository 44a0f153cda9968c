pub mod guild_settings;
