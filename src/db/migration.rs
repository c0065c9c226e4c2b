// src/db/migration.rs
//! Creates the users/refs schema. Run this at startup; every statement is idempotent.

use anyhow::{Context, Result};
use sqlx::{Executor, SqlitePool};
use tracing::debug;

const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    username TEXT,
    first_name TEXT NOT NULL DEFAULT '',
    last_name TEXT,
    is_premium BOOLEAN NOT NULL DEFAULT 0,
    language_code TEXT,
    created_at INTEGER NOT NULL,
    messages_count INTEGER NOT NULL DEFAULT 0
);
"#;

/// Timestamps are unix milliseconds. `ref_name_folded` is the lowercased name used for search.
const CREATE_REFS: &str = r#"
CREATE TABLE IF NOT EXISTS refs (
    id TEXT PRIMARY KEY NOT NULL,
    user_id INTEGER NOT NULL,
    ref_name TEXT NOT NULL,
    ref_name_folded TEXT NOT NULL,
    doc_handle TEXT,
    photo_handle TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    used_at INTEGER,
    used_count INTEGER NOT NULL DEFAULT 0,
    UNIQUE (user_id, ref_name),
    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
);
"#;

const CREATE_REF_INDICES: &str = r#"
CREATE INDEX IF NOT EXISTS idx_refs_user_recency ON refs(user_id, used_at, created_at);
"#;

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    pool.execute(CREATE_USERS)
        .await
        .context("Failed to create users table")?;
    pool.execute(CREATE_REFS)
        .await
        .context("Failed to create refs table")?;
    pool.execute(CREATE_REF_INDICES)
        .await
        .context("Failed to create refs indices")?;

    debug!("Schema is up to date");
    Ok(())
}
