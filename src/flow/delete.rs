// src/flow/delete.rs
// /del: pick via inline mode -> confirm -> delete

use tracing::info;

use super::Flows;
use super::replies::*;
use crate::conversation::{Conversation, ConversationState, PendingData};
use crate::error::FlowResult;
use crate::events::InboundEvent;
use crate::messenger::Keyboard;
use crate::store::Reference;

impl Flows {
    pub(super) async fn start_delete(
        &self,
        event: &InboundEvent,
        conversation: &mut Conversation,
    ) -> FlowResult<()> {
        conversation.clear();
        conversation.set_state(ConversationState::AwaitingDeleteTarget);
        info!(user_id = event.requester.id, "User is deleting a reference");
        self.say(
            event.chat_id,
            ASK_DELETE_TARGET,
            Keyboard::choices([CHOICE_CANCEL]),
        )
        .await
    }

    /// Called when the user picks a reference through inline mode while a delete is pending.
    ///
    /// `selected` is the reference as it is now, or `None` if it is already gone.
    pub async fn select_delete_target(
        &self,
        event: &InboundEvent,
        conversation: &mut Conversation,
        selected: Option<Reference>,
    ) -> FlowResult<()> {
        let owner_id = event.requester.id;
        let Some(reference) = selected.filter(|r| r.owner_id == owner_id) else {
            conversation.clear();
            info!(user_id = owner_id, "Picked reference is already gone");
            return self
                .say(event.chat_id, ALREADY_DELETED, Keyboard::Remove)
                .await;
        };

        conversation.data = PendingData {
            reference_id: Some(reference.id),
            ..PendingData::default()
        };
        conversation.set_state(ConversationState::AwaitingDeleteConfirmation);

        self.say(event.chat_id, CONFIRM_DELETE, Keyboard::Keep).await?;
        self.messenger
            .send_photo(
                event.chat_id,
                &reference.photo_handle,
                None,
                Keyboard::choices([CHOICE_CONFIRM_DELETE, CHOICE_CANCEL]),
            )
            .await?;
        Ok(())
    }

    pub(super) async fn confirm_delete(
        &self,
        event: &InboundEvent,
        conversation: &mut Conversation,
    ) -> FlowResult<()> {
        let owner_id = event.requester.id;
        let deleted = match conversation.data.reference_id {
            Some(reference_id) => match self.store.delete_reference(owner_id, reference_id).await {
                Ok(deleted) => deleted,
                Err(err) => {
                    self.say(event.chat_id, SOMETHING_BROKE, Keyboard::Keep).await?;
                    return Err(err.into());
                }
            },
            None => false,
        };

        info!(
            user_id = owner_id,
            reference_id = ?conversation.data.reference_id,
            deleted,
            "Delete confirmed"
        );
        conversation.clear();
        let reply = if deleted { DELETED } else { DELETE_FAILED };
        self.say(event.chat_id, reply, Keyboard::Remove).await
    }
}
