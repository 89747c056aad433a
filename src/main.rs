use std::sync::Arc;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use liyu_intake::booking::{BookingEngine, ProfileStore, SessionStore};
use liyu_intake::channels::{ChannelManager, CliChannel, TelegramChannel};
use liyu_intake::config::BotConfig;
use liyu_intake::dispatcher::{Dispatcher, DispatcherDeps};
use liyu_intake::i18n::Catalog;
use liyu_intake::store::{Database, LibSqlBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut config = BotConfig::from_env().context("invalid configuration")?;
    let _log_guard = init_tracing(&config);

    eprintln!("🏠 Liyu Agency intake bot v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Database: {}", config.db_path.display());
    eprintln!(
        "   Location step: {}",
        if config.collect_location { "on" } else { "off" }
    );
    eprintln!("   Default language: {}", config.default_language);

    // ── Database ─────────────────────────────────────────────────────────
    let db: Arc<dyn Database> = Arc::new(
        LibSqlBackend::new_local(&config.db_path)
            .await
            .with_context(|| format!("failed to open database at {}", config.db_path.display()))?,
    );

    // ── Engine ───────────────────────────────────────────────────────────
    let profiles = Arc::new(ProfileStore::new(Arc::clone(&db)));
    let engine = Arc::new(BookingEngine::new(
        config.engine(),
        Arc::clone(&db),
        profiles,
    ));
    let sessions = Arc::new(SessionStore::new(config.idle_timeout()));

    // ── Channels ─────────────────────────────────────────────────────────
    let mut channels = ChannelManager::new();

    if let Some(token) = config.telegram_token.take() {
        eprintln!(
            "   Telegram: enabled (allowed: {})",
            if config.allowed_users.iter().any(|u| u == "*") {
                "everyone".to_string()
            } else {
                config.allowed_users.join(", ")
            }
        );
        channels.add(Box::new(TelegramChannel::new(
            token,
            config.allowed_users.clone(),
        )));
    }

    if config.enable_cli {
        eprintln!("   CLI: enabled (type /start, /help, /cancel)");
        channels.add(Box::new(CliChannel::new(local_user_name())));
    }

    if channels.is_empty() {
        anyhow::bail!("no channel enabled: set BOT_TOKEN_CLIENT or LIYU_CLI=true");
    }
    eprintln!("   Channels: {}\n", channels.names().join(", "));

    for (name, result) in channels.health_check_all().await {
        if let Err(e) = result {
            tracing::warn!(channel = %name, error = %e, "Health check failed; starting anyway");
        }
    }

    let deps = DispatcherDeps {
        engine,
        localizer: Arc::new(Catalog::new()),
        sessions,
        db,
        default_language: config.default_language,
        sweep_interval: config.session_sweep_interval,
    };
    Dispatcher::new(deps, channels).run().await?;

    Ok(())
}

/// Console logging on stderr, plus a daily-rolling file when a log
/// directory is configured. The guard must live until exit.
fn init_tracing(config: &BotConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "liyu-intake.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(file_layer)
        .init();

    guard
}

fn local_user_name() -> String {
    std::env::var("USER")
        .ok()
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| "Guest".to_string())
}
