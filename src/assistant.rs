// src/assistant.rs
//! Entry point for every inbound event.

use std::sync::Arc;

use tracing::debug;

use crate::conversation::ConversationManager;
use crate::error::FlowResult;
use crate::events::{EventKind, InboundEvent};
use crate::flow::Flows;
use crate::inline::InlineRetrieval;
use crate::messenger::Messenger;
use crate::store::ReferenceStore;

pub struct Assistant {
    store: ReferenceStore,
    conversations: Arc<ConversationManager>,
    flows: Flows,
    inline: InlineRetrieval,
}

impl Assistant {
    pub fn new(
        store: ReferenceStore,
        messenger: Arc<dyn Messenger>,
        conversations: Arc<ConversationManager>,
        admin_id: Option<i64>,
    ) -> Self {
        let flows = Flows::new(store.clone(), messenger.clone(), admin_id);
        let inline = InlineRetrieval::new(store.clone(), messenger, flows.clone());
        Self {
            store,
            conversations,
            flows,
            inline,
        }
    }

    /// Handle one event.
    ///
    /// Chat messages first record the sender's activity, which also guarantees
    /// the owner row exists before any flow writes a reference. If that write
    /// fails the user gets an apology and the event goes no further. Errors are
    /// returned to the caller for logging; the user has already been told
    /// when something went wrong mid-flow.
    pub async fn handle(&self, event: InboundEvent) -> FlowResult<()> {
        if event.is_message() {
            if let Err(err) = self.store.upsert_user(&event.requester).await {
                self.flows.apologize(event.chat_id).await;
                return Err(err.into());
            }
        }

        match &event.kind {
            EventKind::InlineQuery { query_id, query } => {
                self.inline.answer(&event.requester, query_id, query).await
            }
            EventKind::ChosenInlineResult { result_id } => {
                let mut conversation = self.conversations.acquire(event.conversation_key()).await;
                self.inline
                    .on_chosen(&event, result_id, &mut conversation)
                    .await
            }
            _ => {
                let mut conversation = self.conversations.acquire(event.conversation_key()).await;
                let before = conversation.state;
                let result = self.flows.advance(&event, &mut conversation).await;
                if conversation.state != before {
                    debug!(
                        user_id = event.requester.id,
                        chat_id = event.chat_id,
                        from = %before,
                        to = %conversation.state,
                        "Conversation moved"
                    );
                }
                result
            }
        }
    }

    pub fn store(&self) -> &ReferenceStore {
        &self.store
    }

    pub fn conversations(&self) -> &Arc<ConversationManager> {
        &self.conversations
    }
}
