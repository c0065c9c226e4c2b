// src/telegram/convert.rs
// Telegram updates -> core events

use teloxide::types::{ChosenInlineResult, InlineQuery, Message, User};

use crate::events::{Command, EventKind, InboundEvent};
use crate::store::UserProfile;

pub fn profile(user: &User) -> UserProfile {
    UserProfile {
        id: user.id.0 as i64,
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        is_premium: user.is_premium,
        language_code: user.language_code.clone(),
    }
}

/// `None` for messages without a sender (channel posts).
pub fn message_event(msg: &Message) -> Option<InboundEvent> {
    let user = msg.from.as_ref()?;

    let kind = if let Some(text) = msg.text() {
        match Command::parse(text) {
            Some(command) => EventKind::Command(command),
            None => EventKind::Text(text.to_string()),
        }
    } else if let Some(size) = msg.photo().and_then(|sizes| sizes.last()) {
        EventKind::Photo(size.file.id.clone())
    } else if let Some(document) = msg.document() {
        EventKind::Document(document.file.id.clone())
    } else {
        EventKind::Unsupported
    };

    Some(InboundEvent {
        requester: profile(user),
        chat_id: msg.chat.id.0,
        message_id: Some(msg.id.0),
        kind,
    })
}

pub fn inline_query_event(query: &InlineQuery) -> InboundEvent {
    let requester = profile(&query.from);
    InboundEvent {
        chat_id: requester.id,
        requester,
        message_id: None,
        kind: EventKind::InlineQuery {
            query_id: query.id.clone(),
            query: query.query.clone(),
        },
    }
}

/// Picks carry no chat, so they land in the requester's private chat with the bot.
pub fn chosen_result_event(chosen: &ChosenInlineResult) -> InboundEvent {
    let requester = profile(&chosen.from);
    InboundEvent {
        chat_id: requester.id,
        requester,
        message_id: None,
        kind: EventKind::ChosenInlineResult {
            result_id: chosen.result_id.clone(),
        },
    }
}
