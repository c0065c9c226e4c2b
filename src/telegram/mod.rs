// src/telegram/mod.rs
//! Telegram transport: long polling in, `TelegramMessenger` out.

pub mod convert;
pub mod messenger;

use std::sync::Arc;

use anyhow::{Context, Result};
use teloxide::{
    dispatching::{Dispatcher, UpdateFilterExt},
    dptree,
    error_handlers::LoggingErrorHandler,
    prelude::*,
    types::{BotCommand, ChosenInlineResult, InlineQuery, Update},
};
use tracing::{debug, error, info, warn};

use crate::assistant::Assistant;
use crate::config::RefBotConfig;
use crate::events::InboundEvent;

pub use messenger::TelegramMessenger;

type HandlerResult = Result<(), anyhow::Error>;

/// Register the command list and make the display name carry the running version.
pub async fn prepare_bot(bot: &Bot, config: &RefBotConfig) -> Result<()> {
    bot.set_my_commands(vec![
        BotCommand::new("help", "How to use the bot"),
        BotCommand::new("add", "Add a reference"),
        BotCommand::new("del", "Delete a reference"),
    ])
    .await
    .context("Failed to register bot commands")?;
    info!("Bot command list updated");

    let me = bot.get_me().await.context("Failed to fetch bot identity")?;
    let current = me.user.full_name();
    if let Some(expected) = rename_target(&current, config) {
        // rename is heavily rate limited; a failure must not stop the bot
        match bot.set_my_name().name(expected.clone()).await {
            Ok(_) => info!(from = %current, to = %expected, "Bot renamed"),
            Err(err) => warn!(error = %err, name = %expected, "Failed to rename bot"),
        }
    }
    info!(username = ?me.user.username, "Bot identity confirmed");
    Ok(())
}

/// The name to switch to, or `None` when the bot already carries the versioned name.
fn rename_target(current: &str, config: &RefBotConfig) -> Option<String> {
    let expected = config.version_name();
    (current != expected).then_some(expected)
}

/// Poll for updates until Ctrl-C.
pub async fn run(bot: Bot, assistant: Arc<Assistant>) {
    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(on_message))
        .branch(Update::filter_inline_query().endpoint(on_inline_query))
        .branch(Update::filter_chosen_inline_result().endpoint(on_chosen_inline_result));

    info!("Starting polling");
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![assistant])
        .default_handler(|upd| async move {
            debug!("Unhandled update: {:?}", upd.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "Error in update handler",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    warn!("Dispatcher stopped");
}

async fn on_message(msg: Message, assistant: Arc<Assistant>) -> HandlerResult {
    if let Some(event) = convert::message_event(&msg) {
        dispatch(&assistant, event).await;
    }
    Ok(())
}

async fn on_inline_query(query: InlineQuery, assistant: Arc<Assistant>) -> HandlerResult {
    dispatch(&assistant, convert::inline_query_event(&query)).await;
    Ok(())
}

async fn on_chosen_inline_result(
    chosen: ChosenInlineResult,
    assistant: Arc<Assistant>,
) -> HandlerResult {
    dispatch(&assistant, convert::chosen_result_event(&chosen)).await;
    Ok(())
}

// A failed event is logged here and goes no further; polling carries on.
async fn dispatch(assistant: &Assistant, event: InboundEvent) {
    let user_id = event.requester.id;
    let chat_id = event.chat_id;
    if let Err(err) = assistant.handle(event).await {
        error!(user_id, chat_id, error = %err, "Failed to handle event");
    }
}
