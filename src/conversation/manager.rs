// src/conversation/manager.rs

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info};

use super::{Conversation, ConversationKey, ConversationState};

/// Exclusive access to one conversation for the duration of an event.
pub struct ConversationGuard {
    key: ConversationKey,
    inner: OwnedMutexGuard<Conversation>,
}

impl ConversationGuard {
    pub fn key(&self) -> ConversationKey {
        self.key
    }
}

impl Deref for ConversationGuard {
    type Target = Conversation;

    fn deref(&self) -> &Conversation {
        &self.inner
    }
}

impl DerefMut for ConversationGuard {
    fn deref_mut(&mut self) -> &mut Conversation {
        &mut self.inner
    }
}

/// In-memory conversations with one lock per key.
///
/// Events for the same (user, chat) run one at a time; different keys never
/// wait on each other beyond the brief map lookup.
pub struct ConversationManager {
    conversations: Mutex<HashMap<ConversationKey, Arc<Mutex<Conversation>>>>,
    idle_timeout: Duration,
}

impl ConversationManager {
    pub fn new(idle_timeout: StdDuration) -> Self {
        Self {
            conversations: Mutex::new(HashMap::new()),
            idle_timeout: Duration::from_std(idle_timeout).unwrap_or(Duration::MAX),
        }
    }

    /// Lock the conversation for `key`, creating an idle one if needed.
    ///
    /// A conversation left untouched longer than the idle timeout is reset
    /// before it is handed out.
    pub async fn acquire(&self, key: ConversationKey) -> ConversationGuard {
        let slot = {
            let mut map = self.conversations.lock().await;
            map.entry(key)
                .or_insert_with(|| Arc::new(Mutex::new(Conversation::new())))
                .clone()
        };

        let mut inner = slot.lock_owned().await;
        if !inner.is_idle() && inner.is_stale_at(Utc::now(), self.idle_timeout) {
            info!(
                user_id = key.user_id,
                chat_id = key.chat_id,
                state = %inner.state,
                "Abandoned conversation expired"
            );
            inner.clear();
        }
        inner.mark_active();

        ConversationGuard { key, inner }
    }

    /// Current state without creating a record. Waits if the conversation is busy.
    pub async fn state(&self, key: ConversationKey) -> ConversationState {
        let slot = self.conversations.lock().await.get(&key).cloned();
        match slot {
            Some(slot) => {
                let conversation = slot.lock().await;
                if conversation.is_stale_at(Utc::now(), self.idle_timeout) {
                    ConversationState::Idle
                } else {
                    conversation.state
                }
            }
            None => ConversationState::Idle,
        }
    }

    /// Drop idle and expired conversations nobody is holding. Returns how many were removed.
    pub async fn sweep(&self) -> usize {
        let now = Utc::now();
        let mut map = self.conversations.lock().await;
        let before = map.len();

        map.retain(|_, slot| {
            // a clone outside the map means an event is about to lock it
            if Arc::strong_count(slot) > 1 {
                return true;
            }
            match slot.try_lock() {
                Ok(conversation) => {
                    !(conversation.is_idle() || conversation.is_stale_at(now, self.idle_timeout))
                }
                Err(_) => true,
            }
        });

        before - map.len()
    }

    pub async fn len(&self) -> usize {
        self.conversations.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Spawn the background sweep of finished and abandoned conversations.
pub fn spawn_conversation_sweeper(
    manager: Arc<ConversationManager>,
    interval: StdDuration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;
            let removed = manager.sweep().await;
            if removed > 0 {
                debug!(removed, "Conversation sweep");
            }
        }
    })
}
