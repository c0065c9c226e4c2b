// src/logging.rs

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::config::RefBotConfig;

// Unknown level names fall back to INFO rather than failing startup.
fn max_level(config: &RefBotConfig) -> Level {
    config.log_level.trim().parse().unwrap_or(Level::INFO)
}

/// Install the global tracing subscriber. Call once, before anything logs.
pub fn init(config: &RefBotConfig) -> Result<()> {
    let builder = FmtSubscriber::builder()
        .with_max_level(max_level(config))
        .with_target(config.is_debug());

    match config.log_format.to_lowercase().as_str() {
        "compact" => tracing::subscriber::set_global_default(builder.compact().finish())?,
        _ => tracing::subscriber::set_global_default(builder.pretty().finish())?,
    }
    Ok(())
}
