// tests/common/mod.rs
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use refbot::Assistant;
use refbot::conversation::ConversationManager;
use refbot::db;
use refbot::error::TransportError;
use refbot::events::{Command, EventKind, InboundEvent};
use refbot::messenger::{InlineAnswer, Keyboard, Messenger};
use refbot::store::{ReferenceStore, UserProfile};

pub const ADMIN_ID: i64 = 999;

/// Everything the bot tried to send, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Text {
        chat_id: i64,
        text: String,
        keyboard: Keyboard,
    },
    Photo {
        chat_id: i64,
        handle: String,
        keyboard: Keyboard,
    },
    Upload {
        chat_id: i64,
        handle: String,
    },
    Inline(InlineAnswer),
    Forward {
        to: i64,
        from: i64,
        message_id: i32,
    },
}

#[derive(Default)]
pub struct FakeMessenger {
    sent: Mutex<Vec<Sent>>,
    uploads: AtomicUsize,
    pub fail_downloads: AtomicBool,
}

impl FakeMessenger {
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Text { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn last_text(&self) -> Option<String> {
        self.texts().pop()
    }

    pub fn last_keyboard(&self) -> Option<Keyboard> {
        self.sent().into_iter().rev().find_map(|s| match s {
            Sent::Text { keyboard, .. } | Sent::Photo { keyboard, .. } => Some(keyboard),
            _ => None,
        })
    }

    pub fn inline_answers(&self) -> Vec<InlineAnswer> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Inline(answer) => Some(answer),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }

    fn push(&self, sent: Sent) {
        self.sent.lock().unwrap().push(sent);
    }
}

#[async_trait]
impl Messenger for FakeMessenger {
    async fn send_text(&self, chat_id: i64, text: &str, keyboard: Keyboard) -> Result<(), TransportError> {
        self.push(Sent::Text {
            chat_id,
            text: text.to_string(),
            keyboard,
        });
        Ok(())
    }

    async fn send_photo(
        &self,
        chat_id: i64,
        photo_handle: &str,
        _caption: Option<&str>,
        keyboard: Keyboard,
    ) -> Result<(), TransportError> {
        self.push(Sent::Photo {
            chat_id,
            handle: photo_handle.to_string(),
            keyboard,
        });
        Ok(())
    }

    async fn upload_photo(
        &self,
        chat_id: i64,
        _bytes: Vec<u8>,
        _caption: Option<&str>,
    ) -> Result<String, TransportError> {
        let n = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        let handle = format!("rendered-{}", n);
        self.push(Sent::Upload {
            chat_id,
            handle: handle.clone(),
        });
        Ok(handle)
    }

    async fn download(&self, handle: &str) -> Result<Vec<u8>, TransportError> {
        if self.fail_downloads.load(Ordering::SeqCst) {
            return Err(TransportError::MediaDownload(format!("no such file: {}", handle)));
        }
        Ok(handle.as_bytes().to_vec())
    }

    async fn answer_inline_query(&self, answer: InlineAnswer) -> Result<(), TransportError> {
        self.push(Sent::Inline(answer));
        Ok(())
    }

    async fn forward_message(&self, to_chat_id: i64, from_chat_id: i64, message_id: i32) -> Result<(), TransportError> {
        self.push(Sent::Forward {
            to: to_chat_id,
            from: from_chat_id,
            message_id,
        });
        Ok(())
    }
}

pub struct Harness {
    pub assistant: Assistant,
    pub messenger: Arc<FakeMessenger>,
}

impl Harness {
    pub fn store(&self) -> &ReferenceStore {
        self.assistant.store()
    }
}

pub async fn create_test_store() -> ReferenceStore {
    let pool = db::connect_in_memory()
        .await
        .expect("create in-memory sqlite");
    ReferenceStore::new(pool)
}

pub async fn create_harness() -> Harness {
    let store = create_test_store().await;
    let messenger = Arc::new(FakeMessenger::default());
    let conversations = Arc::new(ConversationManager::new(Duration::from_secs(1800)));
    let assistant = Assistant::new(store, messenger.clone(), conversations, Some(ADMIN_ID));
    Harness {
        assistant,
        messenger,
    }
}

pub fn user(id: i64) -> UserProfile {
    UserProfile {
        id,
        username: Some(format!("user{}", id)),
        first_name: format!("User {}", id),
        last_name: None,
        is_premium: false,
        language_code: Some("en".to_string()),
    }
}

/// Private-chat message from `user_id`.
pub fn message(user_id: i64, kind: EventKind) -> InboundEvent {
    InboundEvent {
        requester: user(user_id),
        chat_id: user_id,
        message_id: Some(42),
        kind,
    }
}

pub fn command(user_id: i64, command: Command) -> InboundEvent {
    message(user_id, EventKind::Command(command))
}

pub fn text(user_id: i64, text: &str) -> InboundEvent {
    message(user_id, EventKind::Text(text.to_string()))
}

pub fn inline_query(user_id: i64, query: &str) -> InboundEvent {
    InboundEvent {
        requester: user(user_id),
        chat_id: user_id,
        message_id: None,
        kind: EventKind::InlineQuery {
            query_id: format!("q-{}", user_id),
            query: query.to_string(),
        },
    }
}

pub fn chosen(user_id: i64, result_id: &str) -> InboundEvent {
    InboundEvent {
        requester: user(user_id),
        chat_id: user_id,
        message_id: None,
        kind: EventKind::ChosenInlineResult {
            result_id: result_id.to_string(),
        },
    }
}
