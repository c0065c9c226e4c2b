// src/store/types.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;

pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 128;

/// Most references returned by a single search.
pub const SEARCH_LIMIT: i64 = 10;

/// Identity of a transport user as reported with every inbound event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
    pub is_premium: bool,
    pub language_code: Option<String>,
}

impl UserProfile {
    pub fn full_name(&self) -> String {
        match &self.last_name {
            Some(last) if !last.is_empty() => format!("{} {}", self.first_name, last),
            _ => self.first_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
    pub is_premium: bool,
    pub language_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub messages_count: i64,
}

/// A named pair of media handles owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub id: Uuid,
    pub owner_id: i64,
    pub name: String,
    /// Original document-form handle, resent without recompression.
    pub doc_handle: Option<String>,
    /// Photo-form handle; every reference has one.
    pub photo_handle: String,
    pub created_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub used_count: i64,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UserRow {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
    pub is_premium: bool,
    pub language_code: Option<String>,
    pub created_at: i64,
    pub messages_count: i64,
}

impl From<UserRow> for UserRecord {
    fn from(r: UserRow) -> Self {
        Self {
            id: r.id,
            username: r.username,
            first_name: r.first_name,
            last_name: r.last_name,
            is_premium: r.is_premium,
            language_code: r.language_code,
            created_at: from_millis(r.created_at),
            messages_count: r.messages_count,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ReferenceRow {
    pub id: String,
    pub user_id: i64,
    pub ref_name: String,
    pub doc_handle: Option<String>,
    pub photo_handle: String,
    pub created_at: i64,
    pub used_at: Option<i64>,
    pub used_count: i64,
}

impl TryFrom<ReferenceRow> for Reference {
    type Error = StoreError;

    fn try_from(r: ReferenceRow) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&r.id)
            .map_err(|e| StoreError::Database(sqlx::Error::Decode(Box::new(e))))?;

        Ok(Self {
            id,
            owner_id: r.user_id,
            name: r.ref_name,
            doc_handle: r.doc_handle,
            photo_handle: r.photo_handle,
            created_at: from_millis(r.created_at),
            used_at: r.used_at.map(from_millis),
            used_count: r.used_count,
        })
    }
}

/// Columns selected for every reference read, in `ReferenceRow` order.
pub(crate) const REFERENCE_COLUMNS: &str =
    "id, user_id, ref_name, doc_handle, photo_handle, created_at, used_at, used_count";

pub(crate) const USER_COLUMNS: &str =
    "id, username, first_name, last_name, is_premium, language_code, created_at, messages_count";

pub(crate) fn from_millis(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}

pub(crate) fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Checks a reference name against the allowed length, counted in characters.
pub fn validate_name(name: &str) -> Result<(), StoreError> {
    let len = name.chars().count();
    if (NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len) {
        Ok(())
    } else {
        Err(StoreError::InvalidName {
            len,
            min: NAME_MIN_LEN,
            max: NAME_MAX_LEN,
        })
    }
}
