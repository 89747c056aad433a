//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::booking::EngineConfig;
use crate::error::ConfigError;
use crate::i18n::Language;

/// Bot process configuration, read from the environment.
#[derive(Debug)]
pub struct BotConfig {
    /// Telegram bot token. Without it only the CLI channel runs.
    pub telegram_token: Option<SecretString>,
    /// Telegram usernames or numeric ids allowed to talk to the bot; `*` for everyone.
    pub allowed_users: Vec<String>,
    pub db_path: PathBuf,
    /// Ask for a location before review.
    pub collect_location: bool,
    /// Language for users without a saved preference.
    pub default_language: Language,
    /// Sessions idle for longer than this are dropped.
    pub session_idle_timeout: Duration,
    /// How often idle sessions are swept.
    pub session_sweep_interval: Duration,
    /// Directory for daily-rolling log files, if any.
    pub log_dir: Option<PathBuf>,
    /// Run the stdin/stdout channel.
    pub enable_cli: bool,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            telegram_token: None,
            allowed_users: vec!["*".to_string()],
            db_path: PathBuf::from("./data/liyu_agency.db"),
            collect_location: true,
            default_language: Language::English,
            session_idle_timeout: Duration::from_secs(24 * 60 * 60), // 1 day
            session_sweep_interval: Duration::from_secs(600),        // 10 minutes
            log_dir: None,
            enable_cli: true,
        }
    }
}

impl BotConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`; unset and blank values take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let telegram_token = get("BOT_TOKEN_CLIENT")
            .or_else(|| get("TELEGRAM_BOT_TOKEN"))
            .map(SecretString::from);

        let allowed_users = match get("TELEGRAM_ALLOWED_USERS") {
            Some(list) => list
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => defaults.allowed_users,
        };

        let db_path = get("LIYU_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let collect_location = match get("LIYU_COLLECT_LOCATION") {
            Some(v) => parse_bool("LIYU_COLLECT_LOCATION", &v)?,
            None => defaults.collect_location,
        };

        let default_language = match get("LIYU_DEFAULT_LANGUAGE") {
            Some(v) => v.parse().map_err(|_| ConfigError::InvalidValue {
                key: "LIYU_DEFAULT_LANGUAGE".into(),
                message: format!("unknown language '{v}'"),
            })?,
            None => defaults.default_language,
        };

        let session_idle_timeout = match get("LIYU_SESSION_IDLE_MINS") {
            Some(v) => Duration::from_secs(parse_positive("LIYU_SESSION_IDLE_MINS", &v)? * 60),
            None => defaults.session_idle_timeout,
        };

        let session_sweep_interval = match get("LIYU_SESSION_SWEEP_SECS") {
            Some(v) => Duration::from_secs(parse_positive("LIYU_SESSION_SWEEP_SECS", &v)?),
            None => defaults.session_sweep_interval,
        };

        let log_dir = get("LIYU_LOG_DIR").map(PathBuf::from);

        let enable_cli = match get("LIYU_CLI") {
            Some(v) => parse_bool("LIYU_CLI", &v)?,
            None => telegram_token.is_none(),
        };

        Ok(Self {
            telegram_token,
            allowed_users,
            db_path,
            collect_location,
            default_language,
            session_idle_timeout,
            session_sweep_interval,
            log_dir,
            enable_cli,
        })
    }

    pub fn engine(&self) -> EngineConfig {
        EngineConfig {
            collect_location: self.collect_location,
        }
    }

    /// Idle timeout in the form the session store expects.
    pub fn idle_timeout(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.session_idle_timeout).unwrap_or(chrono::Duration::MAX)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.into(),
            message: format!("expected a boolean, got '{value}'"),
        }),
    }
}

fn parse_positive(key: &str, value: &str) -> Result<u64, ConfigError> {
    match value.parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidValue {
            key: key.into(),
            message: format!("expected a positive integer, got '{value}'"),
        }),
    }
}
