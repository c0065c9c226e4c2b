// src/flow/mod.rs
//! The add/delete conversation state machine.
//!
//! `Flows::advance` is the transition table: every (state, event) pair the bot
//! reacts to is one arm of a single match. Commands and the cancel choice work
//! from any state; pairs with no arm re-prompt for the current step, or are
//! ignored when the conversation is idle.

mod add;
mod delete;
pub mod replies;

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::conversation::{Conversation, ConversationState};
use crate::error::FlowResult;
use crate::events::{Command, EventKind, InboundEvent};
use crate::messenger::{Keyboard, Messenger};
use crate::store::ReferenceStore;

use replies::*;

#[derive(Clone)]
pub struct Flows {
    store: ReferenceStore,
    messenger: Arc<dyn Messenger>,
    /// Uploads are forwarded here when set.
    admin_id: Option<i64>,
}

impl Flows {
    pub fn new(store: ReferenceStore, messenger: Arc<dyn Messenger>, admin_id: Option<i64>) -> Self {
        Self {
            store,
            messenger,
            admin_id,
        }
    }

    pub async fn advance(&self, event: &InboundEvent, conversation: &mut Conversation) -> FlowResult<()> {
        use ConversationState::*;

        match (conversation.state, &event.kind) {
            (_, EventKind::Command(command)) => self.on_command(event, command, conversation).await,
            (_, EventKind::Text(text)) if text == CHOICE_CANCEL => self.cancel(event, conversation).await,

            (AwaitingName, EventKind::Text(text)) => self.accept_name(event, text, conversation).await,
            (AwaitingMedia, EventKind::Photo(handle)) => {
                self.accept_photo(event, handle, conversation).await
            }
            (AwaitingMedia, EventKind::Text(text))
                if text == CHOICE_SAVE_AS_IS && conversation.data.photo_handle.is_some() =>
            {
                self.save_reference(event, conversation).await
            }
            (AwaitingMedia, EventKind::Document(handle)) => {
                self.accept_document(event, handle, conversation).await
            }
            (AwaitingAddConfirmation, EventKind::Text(text))
                if text == CHOICE_SAVE
                    && conversation.data.photo_handle.is_some()
                    && conversation.data.doc_handle.is_some() =>
            {
                self.save_reference(event, conversation).await
            }
            (AwaitingDeleteConfirmation, EventKind::Text(text)) if text == CHOICE_CONFIRM_DELETE => {
                self.confirm_delete(event, conversation).await
            }

            (Idle, _) => {
                debug!(user_id = event.requester.id, "Ignoring message outside of a flow");
                Ok(())
            }
            (state, _) => self.remind(event.chat_id, state).await,
        }
    }

    async fn on_command(
        &self,
        event: &InboundEvent,
        command: &Command,
        conversation: &mut Conversation,
    ) -> FlowResult<()> {
        match command {
            Command::Start => self.say(event.chat_id, GREETING, Keyboard::Keep).await,
            Command::Help => self.say(event.chat_id, HELP, Keyboard::Keep).await,
            Command::Add => self.start_add(event, conversation).await,
            Command::Delete => self.start_delete(event, conversation).await,
            Command::Other(name) => {
                debug!(user_id = event.requester.id, command = %name, "Unknown command");
                self.say(event.chat_id, UNKNOWN_COMMAND, Keyboard::Keep).await
            }
        }
    }

    async fn cancel(&self, event: &InboundEvent, conversation: &mut Conversation) -> FlowResult<()> {
        info!(
            user_id = event.requester.id,
            state = %conversation.state,
            "User cancelled"
        );
        conversation.clear();
        self.say(event.chat_id, CANCELLED, Keyboard::Remove).await
    }

    /// Repeat what the current step expects.
    async fn remind(&self, chat_id: i64, state: ConversationState) -> FlowResult<()> {
        let text = match state {
            ConversationState::Idle => return Ok(()),
            ConversationState::AwaitingName => ASK_NAME,
            ConversationState::AwaitingMedia => REMIND_MEDIA,
            ConversationState::AwaitingAddConfirmation => REMIND_ADD_CONFIRMATION,
            ConversationState::AwaitingDeleteTarget => ASK_DELETE_TARGET,
            ConversationState::AwaitingDeleteConfirmation => REMIND_DELETE_CONFIRMATION,
        };
        self.say(chat_id, text, Keyboard::Keep).await
    }

    /// Tell the user something failed on our side. Send failures are only logged,
    /// the caller is already propagating the original error.
    pub async fn apologize(&self, chat_id: i64) {
        if let Err(err) = self
            .messenger
            .send_text(chat_id, SOMETHING_BROKE, Keyboard::Keep)
            .await
        {
            warn!(chat_id, error = %err, "Failed to send apology");
        }
    }

    async fn say(&self, chat_id: i64, text: &str, keyboard: Keyboard) -> FlowResult<()> {
        self.messenger.send_text(chat_id, text, keyboard).await?;
        Ok(())
    }

    /// Debug aid: copy an upload to the admin chat. Failures never affect the flow.
    async fn forward_to_admin(&self, event: &InboundEvent) {
        let (Some(admin_id), Some(message_id)) = (self.admin_id, event.message_id) else {
            return;
        };
        if let Err(err) = self
            .messenger
            .forward_message(admin_id, event.chat_id, message_id)
            .await
        {
            warn!(admin_id, error = %err, "Failed to forward upload to admin");
        }
    }
}
