// src/store/references.rs
// Reference rows: insert, search by recency, use tracking and owner-scoped delete

use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use super::pattern::{fold_name, substring_pattern};
use super::types::{
    REFERENCE_COLUMNS, Reference, ReferenceRow, SEARCH_LIMIT, now_millis, validate_name,
};
use crate::error::StoreError;

/// Insert a new reference.
///
/// Name uniqueness is enforced by the `UNIQUE (user_id, ref_name)` constraint
/// alone, so a concurrent insert of the same name surfaces as `DuplicateName`.
pub async fn add_reference(
    pool: &SqlitePool,
    owner_id: i64,
    name: &str,
    doc_handle: Option<&str>,
    photo_handle: &str,
) -> Result<Reference, StoreError> {
    validate_name(name)?;

    let sql = format!(
        r#"
        INSERT INTO refs (id, user_id, ref_name, ref_name_folded, doc_handle, photo_handle, created_at, used_at, used_count)
        VALUES (?, ?, ?, ?, ?, ?, ?, NULL, 0)
        RETURNING {REFERENCE_COLUMNS}
        "#
    );

    let row = sqlx::query_as::<_, ReferenceRow>(&sql)
        .bind(Uuid::new_v4().to_string())
        .bind(owner_id)
        .bind(name)
        .bind(fold_name(name))
        .bind(doc_handle)
        .bind(photo_handle)
        .bind(now_millis())
        .fetch_one(pool)
        .await
        .map_err(|e| map_insert_error(e, owner_id, name))?;

    let reference = Reference::try_from(row)?;
    info!(user_id = owner_id, reference_id = %reference.id, "Reference added");
    Ok(reference)
}

fn map_insert_error(err: sqlx::Error, owner_id: i64, name: &str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StoreError::DuplicateName {
                name: name.to_string(),
            };
        }
        if db_err.is_foreign_key_violation() {
            return StoreError::OwnerNotFound(owner_id);
        }
    }
    StoreError::Database(err)
}

/// Up to ten of the owner's references, most recently used first.
///
/// Never-used references sort after used ones; ties go to the newest. An empty
/// query lists everything.
pub async fn search_references(
    pool: &SqlitePool,
    owner_id: i64,
    query: Option<&str>,
) -> Result<Vec<Reference>, StoreError> {
    let pattern = query.filter(|q| !q.is_empty()).map(substring_pattern);

    let sql = format!(
        r#"
        SELECT {REFERENCE_COLUMNS}
        FROM refs
        WHERE user_id = ?
          AND (? IS NULL OR ref_name_folded LIKE ? ESCAPE '\')
        ORDER BY used_at IS NULL, used_at DESC, created_at DESC, rowid DESC
        LIMIT ?
        "#
    );

    let rows = sqlx::query_as::<_, ReferenceRow>(&sql)
        .bind(owner_id)
        .bind(&pattern)
        .bind(&pattern)
        .bind(SEARCH_LIMIT)
        .fetch_all(pool)
        .await?;

    rows.into_iter().map(Reference::try_from).collect()
}

pub async fn get_reference(
    pool: &SqlitePool,
    reference_id: Uuid,
) -> Result<Option<Reference>, StoreError> {
    let sql = format!("SELECT {REFERENCE_COLUMNS} FROM refs WHERE id = ?");
    let row = sqlx::query_as::<_, ReferenceRow>(&sql)
        .bind(reference_id.to_string())
        .fetch_optional(pool)
        .await?;

    row.map(Reference::try_from).transpose()
}

/// Count one use of a reference in a single `UPDATE`, so concurrent picks never lose a count.
///
/// Returns the row as it is after the increment, or `None` when the reference no
/// longer exists. Callers only look at presence, which both forms answer the same.
pub async fn record_use(
    pool: &SqlitePool,
    reference_id: Uuid,
) -> Result<Option<Reference>, StoreError> {
    let sql = format!(
        r#"
        UPDATE refs
        SET used_count = used_count + 1, used_at = ?
        WHERE id = ?
        RETURNING {REFERENCE_COLUMNS}
        "#
    );

    let row = sqlx::query_as::<_, ReferenceRow>(&sql)
        .bind(now_millis())
        .bind(reference_id.to_string())
        .fetch_optional(pool)
        .await?;

    if row.is_none() {
        debug!(reference_id = %reference_id, "Use recorded for a missing reference");
    }
    row.map(Reference::try_from).transpose()
}

/// Delete a reference if it belongs to `owner_id`. Returns whether a row was removed.
pub async fn delete_reference(
    pool: &SqlitePool,
    owner_id: i64,
    reference_id: Uuid,
) -> Result<bool, StoreError> {
    let result = sqlx::query("DELETE FROM refs WHERE id = ? AND user_id = ?")
        .bind(reference_id.to_string())
        .bind(owner_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
