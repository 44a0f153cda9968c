// modslash-core/src/config.rs
//
// Runtime settings assembled by the server binary from command-line arguments and
// environment variables.

use std::fmt;
use std::str::FromStr;

use twilight_model::id::Id;
use twilight_model::id::marker::{GuildMarker, UserMarker};

use crate::Error;

/// Which command surfaces get registered with Discord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommandSurfaceMode {
    /// Slash commands only.
    #[default]
    Slash,
    /// Slash commands, user context menu entries and text prefix commands.
    Full,
}

impl CommandSurfaceMode {
    pub fn context_menus(self) -> bool {
        matches!(self, CommandSurfaceMode::Full)
    }

    pub fn prefix_commands(self) -> bool {
        matches!(self, CommandSurfaceMode::Full)
    }
}

impl FromStr for CommandSurfaceMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "slash" => Ok(CommandSurfaceMode::Slash),
            "full" => Ok(CommandSurfaceMode::Full),
            other => Err(Error::Config(format!(
                "unknown command surface '{other}', expected 'slash' or 'full'"
            ))),
        }
    }
}

impl fmt::Display for CommandSurfaceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandSurfaceMode::Slash => f.write_str("slash"),
            CommandSurfaceMode::Full => f.write_str("full"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModSlashConfig {
    pub token: String,
    /// Postgres URL. Without one, settings live in memory for the process lifetime.
    pub database_url: Option<String>,
    pub surface: CommandSurfaceMode,
    pub prefix: String,
    /// Owners in addition to the application owner / team fetched at startup.
    pub extra_owner_ids: Vec<Id<UserMarker>>,
    /// Register commands in this guild only instead of globally.
    pub register_guild: Option<Id<GuildMarker>>,
}

impl ModSlashConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.token.trim().is_empty() {
            return Err(Error::Config("Discord token is empty".into()));
        }
        if self.surface.prefix_commands() && self.prefix.trim().is_empty() {
            return Err(Error::Config("prefix must not be empty for the full surface".into()));
        }
        if let Some(url) = &self.database_url {
            if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
                return Err(Error::Config(format!("unsupported database url: {url}")));
            }
        }
        Ok(())
    }
}

/// Parses a comma separated list of user ids, ignoring blanks.
pub fn parse_owner_ids(raw: &str) -> Result<Vec<Id<UserMarker>>, Error> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u64>()
                .ok()
                .and_then(Id::new_checked)
                .ok_or_else(|| Error::Config(format!("invalid owner id: {s}")))
        })
        .collect()
}

/// Parses a single guild id.
pub fn parse_guild_id(raw: &str) -> Result<Id<GuildMarker>, Error> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .and_then(Id::new_checked)
        .ok_or_else(|| Error::Config(format!("invalid guild id: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> ModSlashConfig {
        ModSlashConfig {
            token: "token".into(),
            database_url: None,
            surface: CommandSurfaceMode::Slash,
            prefix: "!".into(),
            extra_owner_ids: Vec::new(),
            register_guild: None,
        }
    }

    #[test]
    fn surface_parses_case_insensitively() {
        assert_eq!("FULL".parse::<CommandSurfaceMode>().unwrap(), CommandSurfaceMode::Full);
        assert_eq!(" slash ".parse::<CommandSurfaceMode>().unwrap(), CommandSurfaceMode::Slash);
        assert!("menus".parse::<CommandSurfaceMode>().is_err());
    }

    #[test]
    fn owner_ids_skip_blanks_and_reject_zero() {
        let ids = parse_owner_ids("1, 2,,3 ").unwrap();
        assert_eq!(ids, vec![Id::new(1), Id::new(2), Id::new(3)]);
        assert!(parse_owner_ids("0").is_err());
        assert!(parse_owner_ids("abc").is_err());
        assert!(parse_owner_ids("").unwrap().is_empty());
    }

    #[test]
    fn validate_rejects_empty_token_and_bad_url() {
        let mut cfg = base();
        assert!(cfg.validate().is_ok());

        cfg.token = "  ".into();
        assert!(matches!(cfg.validate(), Err(Error::Config(_))));

        let mut cfg = base();
        cfg.database_url = Some("mysql://localhost/db".into());
        assert!(cfg.validate().is_err());

        let mut cfg = base();
        cfg.surface = CommandSurfaceMode::Full;
        cfg.prefix = String::new();
        assert!(cfg.validate().is_err());
    }
}
