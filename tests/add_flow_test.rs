// tests/add_flow_test.rs

mod common;

use std::sync::atomic::Ordering;

use common::*;
use refbot::conversation::{ConversationKey, ConversationState};
use refbot::events::{Command, EventKind};
use refbot::flow::replies::*;
use refbot::messenger::Keyboard;

const USER: i64 = 10;

async fn state(h: &Harness) -> ConversationState {
    h.assistant
        .conversations()
        .state(ConversationKey::private(USER))
        .await
}

#[tokio::test]
async fn test_add_with_document_saves_both_handles() {
    let h = create_harness().await;

    h.assistant.handle(command(USER, Command::Add)).await.unwrap();
    assert_eq!(state(&h).await, ConversationState::AwaitingName);
    assert_eq!(h.messenger.last_text().as_deref(), Some(ASK_NAME));

    h.assistant.handle(text(USER, "Miku")).await.unwrap();
    assert_eq!(state(&h).await, ConversationState::AwaitingMedia);
    {
        let conversation = h
            .assistant
            .conversations()
            .acquire(ConversationKey::private(USER))
            .await;
        assert_eq!(conversation.data.name.as_deref(), Some("Miku"));
    }

    h.assistant
        .handle(message(USER, EventKind::Document("doc-miku".into())))
        .await
        .unwrap();
    assert_eq!(state(&h).await, ConversationState::AwaitingAddConfirmation);
    assert_eq!(h.messenger.last_text().as_deref(), Some(READY_TO_SAVE));
    assert_eq!(
        h.messenger.last_keyboard(),
        Some(Keyboard::choices([CHOICE_SAVE, CHOICE_CANCEL]))
    );
    assert!(h.messenger.sent().contains(&Sent::Forward {
        to: ADMIN_ID,
        from: USER,
        message_id: 42,
    }));

    h.assistant.handle(text(USER, CHOICE_SAVE)).await.unwrap();
    assert_eq!(state(&h).await, ConversationState::Idle);
    assert_eq!(h.messenger.last_text().as_deref(), Some(SAVED));
    assert_eq!(h.messenger.last_keyboard(), Some(Keyboard::Remove));

    let saved = h.store().search_references(USER, None).await.unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].name, "Miku");
    assert_eq!(saved[0].doc_handle.as_deref(), Some("doc-miku"));
    assert_eq!(saved[0].photo_handle, "rendered-1");
}

#[tokio::test]
async fn test_add_with_photo_requires_explicit_opt_in() {
    let h = create_harness().await;

    h.assistant.handle(command(USER, Command::Add)).await.unwrap();
    h.assistant.handle(text(USER, "Rin")).await.unwrap();
    h.assistant
        .handle(message(USER, EventKind::Photo("photo-rin".into())))
        .await
        .unwrap();

    assert_eq!(state(&h).await, ConversationState::AwaitingMedia);
    assert_eq!(h.messenger.last_text().as_deref(), Some(PHOTO_NOT_FILE));
    assert!(h.store().search_references(USER, None).await.unwrap().is_empty());

    h.assistant.handle(text(USER, CHOICE_SAVE_AS_IS)).await.unwrap();
    assert_eq!(state(&h).await, ConversationState::Idle);

    let saved = h.store().search_references(USER, None).await.unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].photo_handle, "photo-rin");
    assert!(saved[0].doc_handle.is_none());
}

#[tokio::test]
async fn test_save_as_is_without_photo_reprompts() {
    let h = create_harness().await;

    h.assistant.handle(command(USER, Command::Add)).await.unwrap();
    h.assistant.handle(text(USER, "Rin")).await.unwrap();
    h.assistant.handle(text(USER, CHOICE_SAVE_AS_IS)).await.unwrap();

    assert_eq!(state(&h).await, ConversationState::AwaitingMedia);
    assert_eq!(h.messenger.last_text().as_deref(), Some(REMIND_MEDIA));
    assert!(h.store().search_references(USER, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_names_keep_waiting_for_name() {
    let h = create_harness().await;

    h.assistant.handle(command(USER, Command::Add)).await.unwrap();

    h.assistant.handle(text(USER, "M")).await.unwrap();
    assert_eq!(state(&h).await, ConversationState::AwaitingName);
    assert_eq!(h.messenger.last_text().as_deref(), Some(NAME_TOO_SHORT));

    h.assistant.handle(text(USER, &"x".repeat(200))).await.unwrap();
    assert_eq!(state(&h).await, ConversationState::AwaitingName);
    assert_eq!(h.messenger.last_text().as_deref(), Some(NAME_TOO_LONG));
}

#[tokio::test]
async fn test_duplicate_name_returns_to_name_step() {
    let h = create_harness().await;
    h.store().upsert_user(&user(USER)).await.unwrap();
    h.store()
        .add_reference(USER, "Miku", None, "old-photo")
        .await
        .unwrap();

    h.assistant.handle(command(USER, Command::Add)).await.unwrap();
    h.assistant.handle(text(USER, "Miku")).await.unwrap();
    h.assistant
        .handle(message(USER, EventKind::Photo("new-photo".into())))
        .await
        .unwrap();
    h.assistant.handle(text(USER, CHOICE_SAVE_AS_IS)).await.unwrap();

    assert_eq!(state(&h).await, ConversationState::AwaitingName);
    assert_eq!(h.messenger.last_text().as_deref(), Some(DUPLICATE_NAME));

    // A fresh name starts over, so the photo has to be sent again
    h.assistant.handle(text(USER, "Miku 2")).await.unwrap();
    assert_eq!(state(&h).await, ConversationState::AwaitingMedia);
    h.assistant.handle(text(USER, CHOICE_SAVE_AS_IS)).await.unwrap();
    assert_eq!(h.messenger.last_text().as_deref(), Some(REMIND_MEDIA));

    h.assistant
        .handle(message(USER, EventKind::Photo("new-photo".into())))
        .await
        .unwrap();
    h.assistant.handle(text(USER, CHOICE_SAVE_AS_IS)).await.unwrap();
    assert_eq!(state(&h).await, ConversationState::Idle);
    assert_eq!(h.store().search_references(USER, None).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_document_download_failure_keeps_state() {
    let h = create_harness().await;
    h.messenger.fail_downloads.store(true, Ordering::SeqCst);

    h.assistant.handle(command(USER, Command::Add)).await.unwrap();
    h.assistant.handle(text(USER, "Luka")).await.unwrap();
    h.assistant
        .handle(message(USER, EventKind::Document("broken".into())))
        .await
        .unwrap();

    assert_eq!(state(&h).await, ConversationState::AwaitingMedia);
    assert_eq!(h.messenger.last_text().as_deref(), Some(COULD_NOT_PROCESS));

    h.messenger.fail_downloads.store(false, Ordering::SeqCst);
    h.assistant
        .handle(message(USER, EventKind::Document("fixed".into())))
        .await
        .unwrap();
    assert_eq!(state(&h).await, ConversationState::AwaitingAddConfirmation);
}

#[tokio::test]
async fn test_cancel_discards_pending_reference() {
    let h = create_harness().await;

    h.assistant.handle(command(USER, Command::Add)).await.unwrap();
    h.assistant.handle(text(USER, "Miku")).await.unwrap();
    h.assistant
        .handle(message(USER, EventKind::Document("doc".into())))
        .await
        .unwrap();
    h.assistant.handle(text(USER, CHOICE_CANCEL)).await.unwrap();

    assert_eq!(state(&h).await, ConversationState::Idle);
    assert_eq!(h.messenger.last_text().as_deref(), Some(CANCELLED));
    assert_eq!(h.messenger.last_keyboard(), Some(Keyboard::Remove));
    assert!(h.store().search_references(USER, None).await.unwrap().is_empty());

    // Save after cancel does nothing
    h.messenger.clear();
    h.assistant.handle(text(USER, CHOICE_SAVE)).await.unwrap();
    assert!(h.messenger.sent().is_empty());
}

#[tokio::test]
async fn test_commands_restart_from_any_state() {
    let h = create_harness().await;

    h.assistant.handle(command(USER, Command::Add)).await.unwrap();
    h.assistant.handle(text(USER, "Miku")).await.unwrap();
    h.assistant.handle(command(USER, Command::Delete)).await.unwrap();
    assert_eq!(state(&h).await, ConversationState::AwaitingDeleteTarget);

    h.assistant.handle(command(USER, Command::Add)).await.unwrap();
    assert_eq!(state(&h).await, ConversationState::AwaitingName);

    h.assistant.handle(command(USER, Command::Help)).await.unwrap();
    assert_eq!(h.messenger.last_text().as_deref(), Some(HELP));
    assert_eq!(state(&h).await, ConversationState::AwaitingName);
}

#[tokio::test]
async fn test_idle_chatter_is_ignored_and_counted() {
    let h = create_harness().await;

    h.assistant.handle(text(USER, "hello?")).await.unwrap();
    h.assistant.handle(message(USER, EventKind::Unsupported)).await.unwrap();

    assert!(h.messenger.sent().is_empty());
    let record = h.store().get_user(USER).await.unwrap().unwrap();
    assert_eq!(record.messages_count, 2);
}

#[tokio::test]
async fn test_conversations_are_per_chat() {
    let h = create_harness().await;
    let group_chat = -500;

    h.assistant.handle(command(USER, Command::Add)).await.unwrap();

    let mut in_group = text(USER, "Miku");
    in_group.chat_id = group_chat;
    h.assistant.handle(in_group).await.unwrap();

    assert_eq!(state(&h).await, ConversationState::AwaitingName);
    assert_eq!(
        h.assistant
            .conversations()
            .state(ConversationKey::new(USER, group_chat))
            .await,
        ConversationState::Idle
    );
}

#[tokio::test]
async fn test_store_outage_mid_flow_is_reported() {
    let h = create_harness().await;

    h.assistant.handle(command(USER, Command::Add)).await.unwrap();
    h.assistant.handle(text(USER, "Miku")).await.unwrap();
    h.messenger.clear();

    h.store().pool.close().await;
    let result = h.assistant.handle(text(USER, CHOICE_CANCEL)).await;

    assert!(result.is_err());
    assert_eq!(h.messenger.texts(), vec![SOMETHING_BROKE.to_string()]);
}
