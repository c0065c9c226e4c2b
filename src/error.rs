// src/error.rs
//! Error taxonomy shared by the store, the messenger and the flows.

use thiserror::Error;

/// Failures raised by the reference store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The owner already has a reference with this exact name.
    #[error("reference '{name}' already exists for this owner")]
    DuplicateName { name: String },

    /// No user row exists for the owner id.
    #[error("owner {0} does not exist")]
    OwnerNotFound(i64),

    #[error("reference name must be {min}-{max} characters, got {len}")]
    InvalidName { len: usize, min: usize, max: usize },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Failures raised by the messaging transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("media download failed: {0}")]
    MediaDownload(String),

    #[error("transport request failed: {0}")]
    Request(String),
}

/// Anything that can go wrong while handling one inbound event.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

pub type FlowResult<T> = Result<T, FlowError>;
