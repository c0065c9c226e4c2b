// src/conversation/mod.rs
//! Per-(user, chat) progress through the add and delete flows.

pub mod manager;

use chrono::{DateTime, Duration, Utc};
use std::fmt;
use uuid::Uuid;

pub use manager::{ConversationGuard, ConversationManager, spawn_conversation_sweeper};

/// A user's conversation is scoped to the chat it happens in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConversationKey {
    pub user_id: i64,
    pub chat_id: i64,
}

impl ConversationKey {
    pub fn new(user_id: i64, chat_id: i64) -> Self {
        Self { user_id, chat_id }
    }

    /// The user's private chat with the bot, where chat id equals user id.
    pub fn private(user_id: i64) -> Self {
        Self::new(user_id, user_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversationState {
    #[default]
    Idle,
    AwaitingName,
    AwaitingMedia,
    AwaitingAddConfirmation,
    AwaitingDeleteTarget,
    AwaitingDeleteConfirmation,
}

impl fmt::Display for ConversationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::AwaitingName => "awaiting_name",
            Self::AwaitingMedia => "awaiting_media",
            Self::AwaitingAddConfirmation => "awaiting_add_confirmation",
            Self::AwaitingDeleteTarget => "awaiting_delete_target",
            Self::AwaitingDeleteConfirmation => "awaiting_delete_confirmation",
        };
        f.write_str(name)
    }
}

/// Values collected while a flow is in progress.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingData {
    pub name: Option<String>,
    pub photo_handle: Option<String>,
    pub doc_handle: Option<String>,
    pub reference_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct Conversation {
    pub state: ConversationState,
    pub data: PendingData,
    pub last_active: DateTime<Utc>,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            state: ConversationState::Idle,
            data: PendingData::default(),
            last_active: Utc::now(),
        }
    }

    pub fn set_state(&mut self, state: ConversationState) {
        self.state = state;
    }

    /// Back to idle with nothing pending.
    pub fn clear(&mut self) {
        self.state = ConversationState::Idle;
        self.data = PendingData::default();
    }

    pub fn is_idle(&self) -> bool {
        self.state == ConversationState::Idle
    }

    pub fn mark_active(&mut self) {
        self.last_active = Utc::now();
    }

    pub fn is_stale_at(&self, now: DateTime<Utc>, timeout: Duration) -> bool {
        now - self.last_active > timeout
    }
}
