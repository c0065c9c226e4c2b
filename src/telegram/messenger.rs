// src/telegram/messenger.rs

use async_trait::async_trait;
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::{
    InlineQueryResult, InlineQueryResultCachedDocument, InlineQueryResultCachedPhoto, InputFile,
    KeyboardButton, KeyboardMarkup, KeyboardRemove, MessageId, ReplyMarkup,
};

use crate::error::TransportError;
use crate::messenger::{CandidateKind, InlineAnswer, Keyboard, Messenger};

/// File name given to photo renditions uploaded from memory.
const RENDITION_FILE_NAME: &str = "reference.png";

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

fn reply_markup(keyboard: &Keyboard) -> Option<ReplyMarkup> {
    match keyboard {
        Keyboard::Keep => None,
        Keyboard::Choices(labels) => {
            let row: Vec<KeyboardButton> = labels
                .iter()
                .map(|label| KeyboardButton::new(label.clone()))
                .collect();
            // hidden again once a choice is pressed
            let markup = KeyboardMarkup::new(vec![row])
                .one_time_keyboard()
                .resize_keyboard();
            Some(ReplyMarkup::Keyboard(markup))
        }
        Keyboard::Remove => Some(ReplyMarkup::KeyboardRemove(KeyboardRemove::new())),
    }
}

fn request_error(err: teloxide::RequestError) -> TransportError {
    TransportError::Request(err.to_string())
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Keyboard,
    ) -> Result<(), TransportError> {
        let mut request = self
            .bot
            .send_message(ChatId(chat_id), text)
            .parse_mode(teloxide::types::ParseMode::Html);
        if let Some(markup) = reply_markup(&keyboard) {
            request = request.reply_markup(markup);
        }
        request.await.map_err(request_error)?;
        Ok(())
    }

    async fn send_photo(
        &self,
        chat_id: i64,
        photo_handle: &str,
        caption: Option<&str>,
        keyboard: Keyboard,
    ) -> Result<(), TransportError> {
        let mut request = self
            .bot
            .send_photo(ChatId(chat_id), InputFile::file_id(photo_handle));
        if let Some(caption) = caption {
            request = request.caption(caption);
        }
        if let Some(markup) = reply_markup(&keyboard) {
            request = request.reply_markup(markup);
        }
        request.await.map_err(request_error)?;
        Ok(())
    }

    async fn upload_photo(
        &self,
        chat_id: i64,
        bytes: Vec<u8>,
        caption: Option<&str>,
    ) -> Result<String, TransportError> {
        let file = InputFile::memory(bytes).file_name(RENDITION_FILE_NAME);
        let mut request = self.bot.send_photo(ChatId(chat_id), file);
        if let Some(caption) = caption {
            request = request.caption(caption);
        }
        let sent = request.await.map_err(request_error)?;

        // largest size last
        sent.photo()
            .and_then(|sizes| sizes.last())
            .map(|size| size.file.id.clone())
            .ok_or_else(|| TransportError::Request("uploaded photo came back without sizes".into()))
    }

    async fn download(&self, handle: &str) -> Result<Vec<u8>, TransportError> {
        let file = self
            .bot
            .get_file(handle)
            .await
            .map_err(|e| TransportError::MediaDownload(e.to_string()))?;

        let mut bytes = Vec::new();
        self.bot
            .download_file(&file.path, &mut bytes)
            .await
            .map_err(|e| TransportError::MediaDownload(e.to_string()))?;
        Ok(bytes)
    }

    async fn answer_inline_query(&self, answer: InlineAnswer) -> Result<(), TransportError> {
        let results: Vec<InlineQueryResult> = answer
            .candidates
            .into_iter()
            .map(|candidate| match candidate.kind {
                CandidateKind::Photo => InlineQueryResult::CachedPhoto(
                    InlineQueryResultCachedPhoto::new(candidate.id, candidate.handle),
                ),
                CandidateKind::Document => {
                    InlineQueryResult::CachedDocument(InlineQueryResultCachedDocument::new(
                        candidate.id,
                        candidate.title.unwrap_or_default(),
                        candidate.handle,
                    ))
                }
            })
            .collect();

        self.bot
            .answer_inline_query(answer.query_id, results)
            .cache_time(answer.cache_time)
            .is_personal(answer.is_personal)
            .await
            .map_err(request_error)?;
        Ok(())
    }

    async fn forward_message(
        &self,
        to_chat_id: i64,
        from_chat_id: i64,
        message_id: i32,
    ) -> Result<(), TransportError> {
        self.bot
            .forward_message(ChatId(to_chat_id), ChatId(from_chat_id), MessageId(message_id))
            .await
            .map_err(request_error)?;
        Ok(())
    }
}
