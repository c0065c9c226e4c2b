// src/flow/add.rs
// /add: name -> media (photo or document) -> save

use tracing::{error, info, warn};

use super::Flows;
use super::replies::*;
use crate::conversation::{Conversation, ConversationState, PendingData};
use crate::error::{FlowResult, StoreError, TransportError};
use crate::events::InboundEvent;
use crate::messenger::Keyboard;
use crate::store::{NAME_MAX_LEN, validate_name};

impl Flows {
    pub(super) async fn start_add(
        &self,
        event: &InboundEvent,
        conversation: &mut Conversation,
    ) -> FlowResult<()> {
        conversation.clear();
        conversation.set_state(ConversationState::AwaitingName);
        info!(user_id = event.requester.id, "User is adding a reference");
        self.say(event.chat_id, ASK_NAME, Keyboard::choices([CHOICE_CANCEL]))
            .await
    }

    /// A valid name starts a fresh pending reference; anything collected before is dropped.
    pub(super) async fn accept_name(
        &self,
        event: &InboundEvent,
        text: &str,
        conversation: &mut Conversation,
    ) -> FlowResult<()> {
        if let Err(StoreError::InvalidName { len, .. }) = validate_name(text) {
            let reply = if len > NAME_MAX_LEN {
                NAME_TOO_LONG
            } else {
                NAME_TOO_SHORT
            };
            return self.say(event.chat_id, reply, Keyboard::Keep).await;
        }

        conversation.data = PendingData {
            name: Some(text.to_string()),
            ..PendingData::default()
        };
        conversation.set_state(ConversationState::AwaitingMedia);
        info!(user_id = event.requester.id, name = %text, "Reference name entered");
        self.say(event.chat_id, ASK_MEDIA, Keyboard::Keep).await
    }

    /// A compressed photo is accepted only after the user explicitly opts in.
    pub(super) async fn accept_photo(
        &self,
        event: &InboundEvent,
        handle: &str,
        conversation: &mut Conversation,
    ) -> FlowResult<()> {
        conversation.data.photo_handle = Some(handle.to_string());
        conversation.data.doc_handle = None;
        info!(user_id = event.requester.id, "Reference uploaded as photo");

        self.say(
            event.chat_id,
            PHOTO_NOT_FILE,
            Keyboard::choices([CHOICE_SAVE_AS_IS, CHOICE_CANCEL]),
        )
        .await?;
        self.forward_to_admin(event).await;
        Ok(())
    }

    pub(super) async fn accept_document(
        &self,
        event: &InboundEvent,
        handle: &str,
        conversation: &mut Conversation,
    ) -> FlowResult<()> {
        let photo_handle = match self.render_photo(event.chat_id, handle).await {
            Ok(photo_handle) => photo_handle,
            Err(err) => {
                warn!(user_id = event.requester.id, error = %err, "Could not convert document");
                return self.say(event.chat_id, COULD_NOT_PROCESS, Keyboard::Keep).await;
            }
        };

        conversation.data.doc_handle = Some(handle.to_string());
        conversation.data.photo_handle = Some(photo_handle);
        conversation.set_state(ConversationState::AwaitingAddConfirmation);
        info!(user_id = event.requester.id, "Reference uploaded as document");

        self.say(
            event.chat_id,
            READY_TO_SAVE,
            Keyboard::choices([CHOICE_SAVE, CHOICE_CANCEL]),
        )
        .await?;
        self.forward_to_admin(event).await;
        Ok(())
    }

    /// Re-upload a document as a photo to get a photo-form handle for it.
    async fn render_photo(&self, chat_id: i64, doc_handle: &str) -> Result<String, TransportError> {
        let bytes = self.messenger.download(doc_handle).await?;
        self.messenger
            .upload_photo(chat_id, bytes, Some(CONVERTED_CAPTION))
            .await
    }

    pub(super) async fn save_reference(
        &self,
        event: &InboundEvent,
        conversation: &mut Conversation,
    ) -> FlowResult<()> {
        let owner_id = event.requester.id;
        let (Some(name), Some(photo_handle)) = (
            conversation.data.name.clone(),
            conversation.data.photo_handle.clone(),
        ) else {
            warn!(user_id = owner_id, state = %conversation.state, "Save requested with nothing pending");
            conversation.clear();
            return self.say(event.chat_id, SOMETHING_BROKE, Keyboard::Remove).await;
        };
        let doc_handle = conversation.data.doc_handle.clone();

        match self
            .store
            .add_reference(owner_id, &name, doc_handle.as_deref(), &photo_handle)
            .await
        {
            Ok(reference) => {
                conversation.clear();
                info!(user_id = owner_id, reference_id = %reference.id, "Reference saved");
                self.say(event.chat_id, SAVED, Keyboard::Remove).await
            }
            Err(StoreError::DuplicateName { .. }) => {
                conversation.set_state(ConversationState::AwaitingName);
                info!(user_id = owner_id, name = %name, "Reference name already taken");
                self.say(event.chat_id, DUPLICATE_NAME, Keyboard::choices([CHOICE_CANCEL]))
                    .await
            }
            Err(err @ StoreError::OwnerNotFound(_)) => {
                error!(user_id = owner_id, error = %err, "Reference owner missing, aborting flow");
                conversation.clear();
                self.say(event.chat_id, SOMETHING_BROKE, Keyboard::Remove).await?;
                Err(err.into())
            }
            Err(err) => {
                self.say(event.chat_id, SOMETHING_BROKE, Keyboard::Keep).await?;
                Err(err.into())
            }
        }
    }
}
