// src/store/mod.rs
//! Persistent users and references.
//!
//! `ReferenceStore` is a cheap-to-clone handle over the connection pool. Each
//! operation borrows a pooled connection for exactly one statement, so every
//! call is individually atomic and the connection is returned on every path.

pub mod pattern;
pub mod references;
pub mod types;
pub mod users;

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::StoreError;

pub use types::{
    NAME_MAX_LEN, NAME_MIN_LEN, Reference, SEARCH_LIMIT, UserProfile, UserRecord, validate_name,
};

#[derive(Clone)]
pub struct ReferenceStore {
    pub pool: SqlitePool,
}

impl ReferenceStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn upsert_user(&self, profile: &UserProfile) -> Result<UserRecord, StoreError> {
        users::upsert_user(&self.pool, profile).await
    }

    pub async fn get_user(&self, user_id: i64) -> Result<Option<UserRecord>, StoreError> {
        users::get_user(&self.pool, user_id).await
    }

    pub async fn delete_user(&self, user_id: i64) -> Result<bool, StoreError> {
        users::delete_user(&self.pool, user_id).await
    }

    pub async fn add_reference(
        &self,
        owner_id: i64,
        name: &str,
        doc_handle: Option<&str>,
        photo_handle: &str,
    ) -> Result<Reference, StoreError> {
        references::add_reference(&self.pool, owner_id, name, doc_handle, photo_handle).await
    }

    pub async fn search_references(
        &self,
        owner_id: i64,
        query: Option<&str>,
    ) -> Result<Vec<Reference>, StoreError> {
        references::search_references(&self.pool, owner_id, query).await
    }

    pub async fn get_reference(&self, reference_id: Uuid) -> Result<Option<Reference>, StoreError> {
        references::get_reference(&self.pool, reference_id).await
    }

    pub async fn record_use(&self, reference_id: Uuid) -> Result<Option<Reference>, StoreError> {
        references::record_use(&self.pool, reference_id).await
    }

    pub async fn delete_reference(
        &self,
        owner_id: i64,
        reference_id: Uuid,
    ) -> Result<bool, StoreError> {
        references::delete_reference(&self.pool, owner_id, reference_id).await
    }
}
