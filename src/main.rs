// src/main.rs

use std::sync::Arc;

use teloxide::Bot;
use tracing::info;

use refbot::config::RefBotConfig;
use refbot::conversation::{ConversationManager, spawn_conversation_sweeper};
use refbot::store::ReferenceStore;
use refbot::telegram::{self, TelegramMessenger};
use refbot::{Assistant, db, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = RefBotConfig::from_env()?;
    logging::init(&config)?;

    info!("Starting {}", config.version_name());
    info!("Database: {}", config.database_url);
    match config.admin_id {
        Some(admin_id) => info!("Admin forwarding enabled for {}", admin_id),
        None => info!("Admin forwarding disabled"),
    }
    if let Some(endpoint) = &config.telemetry_endpoint {
        info!("Telemetry endpoint configured: {}", endpoint);
    }

    let pool = db::connect(&config).await?;
    let store = ReferenceStore::new(pool);

    let conversations = Arc::new(ConversationManager::new(config.conversation_idle_timeout()));
    let sweep_interval = config.conversation_sweep_interval();
    let _sweeper = spawn_conversation_sweeper(conversations.clone(), sweep_interval);
    info!(
        "Conversation sweeper started - running every {} seconds",
        sweep_interval.as_secs()
    );

    let bot = Bot::new(&config.bot_token);
    telegram::prepare_bot(&bot, &config).await?;

    let messenger = Arc::new(TelegramMessenger::new(bot.clone()));
    let assistant = Arc::new(Assistant::new(
        store,
        messenger,
        conversations,
        config.admin_id,
    ));

    telegram::run(bot, assistant).await;
    info!("Shut down");
    Ok(())
}
