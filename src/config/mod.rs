// src/config/mod.rs
// All values come from the environment (optionally seeded from .env)

use anyhow::{Result, bail};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;

static BOT_TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+:.{35}$").expect("static token pattern"));

#[derive(Debug, Clone, Deserialize)]
pub struct RefBotConfig {
    // ── Transport
    pub bot_token: String,
    pub bot_name: String,
    pub admin_id: Option<i64>,
    pub telemetry_endpoint: Option<String>,

    // ── Database
    pub database_url: String,
    pub sqlite_max_connections: u32,
    pub database_timeout: u64,

    // ── Conversations (seconds)
    pub conversation_idle_timeout: u64,
    pub conversation_sweep_interval: u64,

    // ── Logging
    pub log_level: String,
    pub log_format: String,
}

// Values may carry a trailing `# comment` and surrounding whitespace.
fn env_var_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(val) => {
            let clean_val = val.split('#').next().unwrap_or("").trim();
            match clean_val.parse::<T>() {
                Ok(parsed) => parsed,
                Err(_) => {
                    eprintln!("Config: {} = '{}' (parse failed, using default)", key, val);
                    default
                }
            }
        }
        None => default,
    }
}

fn env_var_opt<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let val = lookup(key)?;
    let clean_val = val.split('#').next().unwrap_or("").trim();
    if clean_val.is_empty() {
        return None;
    }
    match clean_val.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            eprintln!("Config: {} = '{}' (parse failed, ignoring)", key, val);
            None
        }
    }
}

impl RefBotConfig {
    pub fn from_env() -> Result<Self> {
        if dotenvy::dotenv().is_err() {
            eprintln!("Warning: .env file not found. Using environment variables and defaults.");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            bot_token: env_var_or(&lookup, "BOT_TOKEN", String::new()),
            bot_name: env_var_or(&lookup, "BOT_NAME", "OC Reference Bot".to_string()),
            admin_id: env_var_opt(&lookup, "BOT_ADMIN_ID"),
            telemetry_endpoint: env_var_opt(&lookup, "TELEMETRY_ENDPOINT"),
            database_url: env_var_or(&lookup, "DATABASE_URL", "sqlite:./refbot.db".to_string()),
            sqlite_max_connections: env_var_or(&lookup, "SQLITE_MAX_CONNECTIONS", 5),
            database_timeout: env_var_or(&lookup, "DATABASE_TIMEOUT", 10),
            conversation_idle_timeout: env_var_or(&lookup, "CONVERSATION_IDLE_TIMEOUT", 1800),
            conversation_sweep_interval: env_var_or(&lookup, "CONVERSATION_SWEEP_INTERVAL", 300),
            log_level: env_var_or(&lookup, "REFBOT_LOG_LEVEL", "info".to_string()),
            log_format: env_var_or(&lookup, "REFBOT_LOG_FORMAT", "pretty".to_string()),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.bot_token.is_empty() {
            bail!("BOT_TOKEN is not set");
        }
        if !BOT_TOKEN_PATTERN.is_match(&self.bot_token) {
            bail!("BOT_TOKEN does not look like a bot token (<digits>:<35 chars>)");
        }
        if self.sqlite_max_connections == 0 {
            bail!("SQLITE_MAX_CONNECTIONS must be at least 1");
        }
        // zero would expire every conversation before its next step arrives
        if self.conversation_idle_timeout == 0 {
            bail!("CONVERSATION_IDLE_TIMEOUT must be at least 1 second");
        }
        if self.conversation_sweep_interval == 0 {
            bail!("CONVERSATION_SWEEP_INTERVAL must be at least 1 second");
        }
        Ok(())
    }

    /// Display name advertised by the bot, tagged with the crate version
    pub fn version_name(&self) -> String {
        format!("{} [{}]", self.bot_name, env!("CARGO_PKG_VERSION"))
    }

    pub fn is_debug(&self) -> bool {
        matches!(self.log_level.to_lowercase().as_str(), "debug" | "trace")
    }

    pub fn database_timeout(&self) -> Duration {
        Duration::from_secs(self.database_timeout)
    }

    pub fn conversation_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.conversation_idle_timeout)
    }

    pub fn conversation_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.conversation_sweep_interval)
    }
}
