// src/inline/mod.rs
//! Inline retrieval: search-as-you-type over the requester's references,
//! and the usage ping that follows a pick.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::conversation::{Conversation, ConversationState};
use crate::error::FlowResult;
use crate::events::InboundEvent;
use crate::flow::Flows;
use crate::messenger::{CandidateKind, InlineAnswer, InlineCandidate, Messenger};
use crate::store::{Reference, ReferenceStore, UserProfile};

/// Seconds the transport may reuse an answer for the same requester and query.
pub const INLINE_CACHE_TIME: u32 = 30;

const PHOTO_PREFIX: &str = "ph_";
const DOCUMENT_PREFIX: &str = "doc_";

/// Identifies an inline candidate: its kind plus the reference behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultTag {
    pub kind: CandidateKind,
    pub reference_id: Uuid,
}

impl ResultTag {
    pub fn photo(reference_id: Uuid) -> Self {
        Self {
            kind: CandidateKind::Photo,
            reference_id,
        }
    }

    pub fn document(reference_id: Uuid) -> Self {
        Self {
            kind: CandidateKind::Document,
            reference_id,
        }
    }

    pub fn parse(result_id: &str) -> Option<Self> {
        let (kind, rest) = if let Some(rest) = result_id.strip_prefix(PHOTO_PREFIX) {
            (CandidateKind::Photo, rest)
        } else if let Some(rest) = result_id.strip_prefix(DOCUMENT_PREFIX) {
            (CandidateKind::Document, rest)
        } else {
            return None;
        };

        let reference_id = Uuid::parse_str(rest).ok()?;
        Some(Self { kind, reference_id })
    }
}

impl fmt::Display for ResultTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.kind {
            CandidateKind::Photo => PHOTO_PREFIX,
            CandidateKind::Document => DOCUMENT_PREFIX,
        };
        write!(f, "{}{}", prefix, self.reference_id)
    }
}

/// A photo candidate for every reference, followed by a document candidate when it has one.
pub fn candidates_for(references: &[Reference]) -> Vec<InlineCandidate> {
    let mut candidates = Vec::with_capacity(references.len() * 2);
    for reference in references {
        candidates.push(InlineCandidate {
            id: ResultTag::photo(reference.id).to_string(),
            kind: CandidateKind::Photo,
            handle: reference.photo_handle.clone(),
            title: None,
        });
        if let Some(doc_handle) = &reference.doc_handle {
            candidates.push(InlineCandidate {
                id: ResultTag::document(reference.id).to_string(),
                kind: CandidateKind::Document,
                handle: doc_handle.clone(),
                title: Some(reference.name.clone()),
            });
        }
    }
    candidates
}

#[derive(Clone)]
pub struct InlineRetrieval {
    store: ReferenceStore,
    messenger: Arc<dyn Messenger>,
    flows: Flows,
}

impl InlineRetrieval {
    pub fn new(store: ReferenceStore, messenger: Arc<dyn Messenger>, flows: Flows) -> Self {
        Self {
            store,
            messenger,
            flows,
        }
    }

    pub async fn answer(
        &self,
        requester: &UserProfile,
        query_id: &str,
        query: &str,
    ) -> FlowResult<()> {
        let references = self
            .store
            .search_references(requester.id, Some(query))
            .await?;
        let candidates = candidates_for(&references);

        self.messenger
            .answer_inline_query(InlineAnswer {
                query_id: query_id.to_string(),
                candidates,
                cache_time: INLINE_CACHE_TIME,
                is_personal: true,
            })
            .await?;

        info!(
            user_id = requester.id,
            matches = references.len(),
            "User is choosing a reference"
        );
        Ok(())
    }

    /// Count the use of a picked reference; while a delete is pending the pick selects its target.
    pub async fn on_chosen(
        &self,
        event: &InboundEvent,
        result_id: &str,
        conversation: &mut Conversation,
    ) -> FlowResult<()> {
        let Some(tag) = ResultTag::parse(result_id) else {
            warn!(user_id = event.requester.id, result_id, "Unrecognised inline result id");
            return Ok(());
        };

        let reference = match self.store.record_use(tag.reference_id).await {
            Ok(reference) => reference,
            Err(err) => {
                // a plain usage ping has nobody waiting on a reply
                if conversation.state == ConversationState::AwaitingDeleteTarget {
                    self.flows.apologize(event.chat_id).await;
                }
                return Err(err.into());
            }
        };
        info!(
            user_id = event.requester.id,
            reference_id = %tag.reference_id,
            kind = ?tag.kind,
            "Reference sent via inline mode"
        );

        if conversation.state == ConversationState::AwaitingDeleteTarget {
            self.flows
                .select_delete_target(event, conversation, reference)
                .await?;
        } else {
            debug!(state = %conversation.state, "Pick outside of a delete flow");
        }
        Ok(())
    }
}
