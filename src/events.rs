// src/events.rs
//! Inbound events as the core sees them, independent of the transport.

use crate::conversation::ConversationKey;
use crate::store::UserProfile;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Add,
    Delete,
    Other(String),
}

impl Command {
    /// Parse `/name`, `/name@BotName` or `/name args`. Returns `None` for anything not starting with `/`.
    pub fn parse(text: &str) -> Option<Self> {
        let rest = text.trim().strip_prefix('/')?;
        let word = rest.split(char::is_whitespace).next().unwrap_or("");
        let name = word.split('@').next().unwrap_or("").to_lowercase();
        if name.is_empty() {
            return None;
        }

        Some(match name.as_str() {
            "start" => Self::Start,
            "help" => Self::Help,
            "add" => Self::Add,
            "del" | "delete" => Self::Delete,
            _ => Self::Other(name),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Command(Command),
    Text(String),
    /// Handle of an uploaded photo (the largest size the transport offers).
    Photo(String),
    /// Handle of an uploaded document.
    Document(String),
    InlineQuery { query_id: String, query: String },
    ChosenInlineResult { result_id: String },
    /// A message the bot has no use for (stickers, voice notes, ...).
    Unsupported,
}

#[derive(Debug, Clone)]
pub struct InboundEvent {
    pub requester: UserProfile,
    /// Chat the event belongs to. Inline events carry the requester's private chat.
    pub chat_id: i64,
    /// Set for chat messages, so uploads can be forwarded.
    pub message_id: Option<i32>,
    pub kind: EventKind,
}

impl InboundEvent {
    pub fn conversation_key(&self) -> ConversationKey {
        ConversationKey::new(self.requester.id, self.chat_id)
    }

    /// Chat messages count towards the user's message counter; inline traffic does not.
    pub fn is_message(&self) -> bool {
        !matches!(
            self.kind,
            EventKind::InlineQuery { .. } | EventKind::ChosenInlineResult { .. }
        )
    }
}
