// src/messenger.rs
//! The outbound side of the transport, as far as the core needs it.

use async_trait::async_trait;

use crate::error::TransportError;

/// Reply keyboard to attach to an outgoing message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Keyboard {
    /// Leave whatever keyboard the user currently has.
    #[default]
    Keep,
    /// One row of choice buttons; pressing one sends its label as text.
    Choices(Vec<String>),
    Remove,
}

impl Keyboard {
    pub fn choices<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Choices(labels.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    Photo,
    Document,
}

/// One selectable entry in an inline answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineCandidate {
    /// Echoed back in the chosen-result event.
    pub id: String,
    pub kind: CandidateKind,
    pub handle: String,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineAnswer {
    pub query_id: String,
    pub candidates: Vec<InlineCandidate>,
    /// Seconds the transport may cache this answer.
    pub cache_time: u32,
    /// Cache per requester rather than for everyone sending the same query.
    pub is_personal: bool,
}

#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_text(&self, chat_id: i64, text: &str, keyboard: Keyboard)
        -> Result<(), TransportError>;

    /// Resend a previously uploaded photo by handle.
    async fn send_photo(
        &self,
        chat_id: i64,
        photo_handle: &str,
        caption: Option<&str>,
        keyboard: Keyboard,
    ) -> Result<(), TransportError>;

    /// Upload raw image bytes as a photo and return the photo handle the transport assigned.
    async fn upload_photo(
        &self,
        chat_id: i64,
        bytes: Vec<u8>,
        caption: Option<&str>,
    ) -> Result<String, TransportError>;

    /// Fetch the content behind a media handle.
    async fn download(&self, handle: &str) -> Result<Vec<u8>, TransportError>;

    async fn answer_inline_query(&self, answer: InlineAnswer) -> Result<(), TransportError>;

    async fn forward_message(
        &self,
        to_chat_id: i64,
        from_chat_id: i64,
        message_id: i32,
    ) -> Result<(), TransportError>;
}
