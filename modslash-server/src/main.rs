use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use modslash_core::config::{parse_guild_id, parse_owner_ids};
use modslash_core::platforms::discord::DiscordPlatform;
use modslash_core::repositories::{GuildSettingsRepository, InMemoryGuildSettingsRepository};
use modslash_core::{CommandSurfaceMode, Database, ModSlashConfig};

#[derive(Parser, Debug, Clone)]
#[command(name = "modslash")]
#[command(author, version, about = "ModSlash - role-gated Discord moderation commands")]
struct Args {
    /// Discord bot token.
    #[arg(long, env = "DISCORD_TOKEN", hide_env_values = true)]
    token: String,

    /// Postgres connection URL. Without it, moderator roles are kept in memory only.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Command surface: "slash" or "full" (adds context menus and prefix commands).
    #[arg(long, env = "MODSLASH_SURFACE", default_value = "slash")]
    surface: CommandSurfaceMode,

    /// Prefix for text commands on the full surface.
    #[arg(long, env = "MODSLASH_PREFIX", default_value = "!")]
    prefix: String,

    /// Comma separated user ids treated as bot owners.
    #[arg(long, env = "MODSLASH_OWNER_IDS", default_value = "")]
    owner_ids: String,

    /// Register commands in this guild only (useful while developing).
    #[arg(long, env = "MODSLASH_REGISTER_GUILD")]
    register_guild: Option<String>,
}

impl Args {
    fn into_config(self) -> anyhow::Result<ModSlashConfig> {
        let config = ModSlashConfig {
            token: self.token,
            database_url: self.database_url.filter(|u| !u.trim().is_empty()),
            surface: self.surface,
            prefix: self.prefix,
            extra_owner_ids: parse_owner_ids(&self.owner_ids)?,
            register_guild: self
                .register_guild
                .as_deref()
                .filter(|g| !g.trim().is_empty())
                .map(parse_guild_id)
                .transpose()?,
        };
        config.validate()?;
        Ok(config)
    }
}

fn init_tracing() {
    let filter = EnvFilter::from_default_env()
        .add_directive("modslash=info".parse().unwrap_or_default());
    let sub = fmt().with_env_filter(filter).finish();
    if let Err(e) = tracing::subscriber::set_global_default(sub) {
        eprintln!("Failed to set global subscriber: {e}");
    }
}

async fn settings_repository(
    config: &ModSlashConfig,
) -> anyhow::Result<Arc<dyn GuildSettingsRepository>> {
    match &config.database_url {
        Some(url) => {
            let db = Database::connect(url)
                .await
                .context("could not connect to Postgres")?;
            db.migrate().await.context("could not apply migrations")?;
            Ok(Arc::new(db.guild_settings()))
        }
        None => {
            warn!("No DATABASE_URL given; moderator roles will be lost on restart.");
            Ok(Arc::new(InMemoryGuildSettingsRepository::new()))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let config = Args::parse().into_config()?;
    info!(
        "ModSlash starting. surface={}, persistent={}, register_guild={:?}",
        config.surface,
        config.database_url.is_some(),
        config.register_guild
    );

    let repo = settings_repository(&config).await?;
    let mut platform = DiscordPlatform::new(config);
    platform.connect(repo).await?;

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {e:?}");
    }
    info!("Ctrl-C detected; shutting down...");
    platform.disconnect().await?;
    Ok(())
}
