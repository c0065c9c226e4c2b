// src/store/users.rs
// User directory: one row per transport user, touched on every inbound message

use sqlx::SqlitePool;
use tracing::debug;

use super::types::{USER_COLUMNS, UserProfile, UserRecord, UserRow, now_millis};
use crate::error::StoreError;

/// Insert the user, or refresh their display fields and bump the message counter.
pub async fn upsert_user(pool: &SqlitePool, profile: &UserProfile) -> Result<UserRecord, StoreError> {
    let sql = format!(
        r#"
        INSERT INTO users (id, username, first_name, last_name, is_premium, language_code, created_at, messages_count)
        VALUES (?, ?, ?, ?, ?, ?, ?, 1)
        ON CONFLICT(id) DO UPDATE SET
            username = excluded.username,
            first_name = excluded.first_name,
            last_name = excluded.last_name,
            is_premium = excluded.is_premium,
            language_code = excluded.language_code,
            messages_count = users.messages_count + 1
        RETURNING {USER_COLUMNS}
        "#
    );

    let row = sqlx::query_as::<_, UserRow>(&sql)
        .bind(profile.id)
        .bind(&profile.username)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(profile.is_premium)
        .bind(&profile.language_code)
        .bind(now_millis())
        .fetch_one(pool)
        .await?;

    debug!(user_id = row.id, messages = row.messages_count, "User activity recorded");
    Ok(row.into())
}

pub async fn get_user(pool: &SqlitePool, user_id: i64) -> Result<Option<UserRecord>, StoreError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
    let row = sqlx::query_as::<_, UserRow>(&sql)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(Into::into))
}

/// Remove a user; their references go with them.
pub async fn delete_user(pool: &SqlitePool, user_id: i64) -> Result<bool, StoreError> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
