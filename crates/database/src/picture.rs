//! Character picture versions.
//!
//! Pictures share the sheets' append-only versioning shape and carry an
//! `active` moderation gate: a newly stored picture stays hidden until
//! an admin confirms it.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DatabaseError, Result};
use crate::models::CharacterPicture;

/// Store a new picture version for (owner, slot). The version starts
/// inactive (pending moderation).
pub async fn set_picture(
    pool: &SqlitePool,
    owner: &str,
    slot: i64,
    file_name: &str,
    creator: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO character_pictures (owner, slot, file_name, creator, created_at, active)
        VALUES (?, ?, ?, ?, CAST(strftime('%s', 'now') AS INTEGER), 0)
        "#,
    )
    .bind(owner)
    .bind(slot)
    .bind(file_name)
    .bind(creator)
    .execute(pool)
    .await?;

    debug!(owner, slot, file_name, "stored picture version");
    Ok(())
}

/// The newest stored picture version for (owner, slot), active or not.
pub async fn latest_picture(
    pool: &SqlitePool,
    owner: &str,
    slot: i64,
) -> Result<Option<CharacterPicture>> {
    let row = sqlx::query_as::<_, CharacterPicture>(
        r#"
        SELECT id, owner, slot, file_name, creator, created_at, active
        FROM character_pictures
        WHERE owner = ? AND slot = ? AND deleted_at IS NULL
        ORDER BY created_at DESC, id DESC
        LIMIT 1
        "#,
    )
    .bind(owner)
    .bind(slot)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Confirm the newest picture version for (owner, slot), making it
/// visible.
pub async fn activate_picture(pool: &SqlitePool, owner: &str, slot: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE character_pictures
        SET active = 1
        WHERE id = (
            SELECT id FROM character_pictures
            WHERE owner = ? AND slot = ? AND deleted_at IS NULL
            ORDER BY created_at DESC, id DESC
            LIMIT 1
        )
        "#,
    )
    .bind(owner)
    .bind(slot)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "CharacterPicture",
            id: format!("{owner}/{slot}"),
        });
    }

    Ok(())
}
