//! Authorization grants.
//!
//! A grant lets a user act on other owners' sheets. Admins are
//! configured statically and are checked by the caller; this module
//! only stores the per-user grants.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::Result;
use crate::models::Authorization;

/// Whether `user_id` holds a grant.
pub async fn is_authorized(pool: &SqlitePool, user_id: &str) -> Result<bool> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM authorizations WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(count > 0)
}

/// Grant `user_id` authorization. Returns `false` if the user already
/// holds a grant.
pub async fn grant(pool: &SqlitePool, user_id: &str, granted_by: &str) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT OR IGNORE INTO authorizations (user_id, granted_by, granted_at)
        VALUES (?, ?, CAST(strftime('%s', 'now') AS INTEGER))
        "#,
    )
    .bind(user_id)
    .bind(granted_by)
    .execute(pool)
    .await?;

    let granted = result.rows_affected() > 0;
    if granted {
        debug!(user_id, granted_by, "authorization granted");
    }
    Ok(granted)
}

/// Revoke `user_id`'s grant. Returns `false` if none existed.
pub async fn revoke(pool: &SqlitePool, user_id: &str) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM authorizations WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// The stored grant for `user_id`, if any.
pub async fn get_grant(pool: &SqlitePool, user_id: &str) -> Result<Option<Authorization>> {
    let row = sqlx::query_as::<_, Authorization>(
        r#"
        SELECT user_id, granted_by, granted_at
        FROM authorizations
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
