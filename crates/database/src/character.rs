//! Character sheet store: slot allocation, append-only versioning,
//! soft deletion, navigation and search.
//!
//! Every write inserts a new row or marks existing rows deleted; rows
//! are never removed. The visible version of an (owner, slot) pair is
//! the newest row without a deletion mark, with row id breaking
//! same-second ties.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DatabaseError, Result};
use crate::models::{Character, CharacterView, OwnerSummary};

/// The lowest slot number; also the implicit default slot.
pub const MIN_SLOT: i64 = 1;

/// Lowest active slot for `owner`, or `None` if the owner has no
/// active sheets.
pub async fn first_slot(pool: &SqlitePool, owner: &str) -> Result<Option<i64>> {
    let min = sqlx::query_scalar::<_, Option<i64>>(
        r#"
        SELECT MIN(slot)
        FROM characters
        WHERE owner = ? AND deleted_at IS NULL
        "#,
    )
    .bind(owner)
    .fetch_one(pool)
    .await?;

    Ok(min)
}

/// Compute the slot the next added sheet for `owner` will occupy.
///
/// Slot 1 is preferentially reused once vacated; otherwise the first
/// gap above an active slot is filled, and with no gap the sheet goes
/// one past the highest active slot.
pub async fn next_free_slot(pool: &SqlitePool, owner: &str) -> Result<i64> {
    match first_slot(pool, owner).await? {
        None => return Ok(MIN_SLOT),
        Some(min) if min != MIN_SLOT => return Ok(MIN_SLOT),
        Some(_) => {}
    }

    // Slot 1 is taken: find the first active slot whose successor is free.
    // The highest active slot always qualifies, so a row exists.
    let next = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT c.slot + 1
        FROM characters c
        WHERE c.owner = ? AND c.deleted_at IS NULL
          AND NOT EXISTS (
              SELECT 1 FROM characters n
              WHERE n.owner = c.owner AND n.slot = c.slot + 1 AND n.deleted_at IS NULL
          )
        ORDER BY c.slot
        LIMIT 1
        "#,
    )
    .bind(owner)
    .fetch_one(pool)
    .await?;

    Ok(next)
}

/// Create a sheet at the next free slot and return that slot.
pub async fn add_character(
    pool: &SqlitePool,
    owner: &str,
    creator: &str,
    text: &str,
) -> Result<i64> {
    let slot = next_free_slot(pool, owner).await?;

    sqlx::query(
        r#"
        INSERT INTO characters (owner, slot, text, creator, created_at)
        VALUES (?, ?, ?, ?, CAST(strftime('%s', 'now') AS INTEGER))
        "#,
    )
    .bind(owner)
    .bind(slot)
    .bind(text)
    .bind(creator)
    .execute(pool)
    .await?;

    debug!(owner, slot, "added character");
    Ok(slot)
}

/// Append a new version to an existing slot and return the slot.
///
/// With `slot = None` the owner's lowest active slot is extended. Fails
/// with `NotFound` if the target slot has no active version: `change`
/// can only extend a sheet that `get` would currently resolve.
pub async fn change_character(
    pool: &SqlitePool,
    owner: &str,
    slot: Option<i64>,
    creator: &str,
    text: &str,
) -> Result<i64> {
    let slot = resolve_slot(pool, owner, slot).await?;

    if get_character(pool, owner, Some(slot)).await?.is_none() {
        return Err(not_found(owner, slot));
    }

    sqlx::query(
        r#"
        INSERT INTO characters (owner, slot, text, creator, created_at)
        VALUES (?, ?, ?, ?, CAST(strftime('%s', 'now') AS INTEGER))
        "#,
    )
    .bind(owner)
    .bind(slot)
    .bind(text)
    .bind(creator)
    .execute(pool)
    .await?;

    debug!(owner, slot, "changed character");
    Ok(slot)
}

/// Resolve the visible version of a slot, annotated with the nearest
/// active slots below and above it for navigation.
///
/// With `slot = None` the owner's lowest active slot is resolved.
pub async fn get_character(
    pool: &SqlitePool,
    owner: &str,
    slot: Option<i64>,
) -> Result<Option<CharacterView>> {
    let slot = match slot {
        Some(slot) => slot,
        None => match first_slot(pool, owner).await? {
            Some(slot) => slot,
            None => return Ok(None),
        },
    };

    let view = sqlx::query_as::<_, CharacterView>(
        r#"
        SELECT c.id, c.owner, c.slot, c.text, c.creator, c.created_at,
            (SELECT MAX(p.slot) FROM characters p
                WHERE p.owner = c.owner AND p.deleted_at IS NULL AND p.slot < c.slot)
                AS prev_slot,
            (SELECT MIN(n.slot) FROM characters n
                WHERE n.owner = c.owner AND n.deleted_at IS NULL AND n.slot > c.slot)
                AS next_slot
        FROM characters c
        WHERE c.owner = ? AND c.slot = ? AND c.deleted_at IS NULL
        ORDER BY c.created_at DESC, c.id DESC
        LIMIT 1
        "#,
    )
    .bind(owner)
    .bind(slot)
    .fetch_optional(pool)
    .await?;

    Ok(view)
}

/// Soft-delete a slot: every active version is marked deleted, fully
/// vacating the slot for the allocator.
pub async fn remove_character(
    pool: &SqlitePool,
    owner: &str,
    slot: Option<i64>,
    deleted_by: &str,
) -> Result<i64> {
    let slot = resolve_slot(pool, owner, slot).await?;

    let result = sqlx::query(
        r#"
        UPDATE characters
        SET deleted_by = ?, deleted_at = CAST(strftime('%s', 'now') AS INTEGER)
        WHERE owner = ? AND slot = ? AND deleted_at IS NULL
        "#,
    )
    .bind(deleted_by)
    .bind(owner)
    .bind(slot)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(not_found(owner, slot));
    }

    debug!(owner, slot, "removed character");
    Ok(slot)
}

/// Mark only the most recent active version of a slot deleted,
/// re-exposing the next most recent surviving version: a one-step undo
/// of the latest edit, not a rollback of the whole history.
pub async fn undo_last_change(
    pool: &SqlitePool,
    owner: &str,
    slot: Option<i64>,
    deleted_by: &str,
) -> Result<i64> {
    let slot = resolve_slot(pool, owner, slot).await?;

    let result = sqlx::query(
        r#"
        UPDATE characters
        SET deleted_by = ?, deleted_at = CAST(strftime('%s', 'now') AS INTEGER)
        WHERE id = (
            SELECT id FROM characters
            WHERE owner = ? AND slot = ? AND deleted_at IS NULL
            ORDER BY created_at DESC, id DESC
            LIMIT 1
        )
        "#,
    )
    .bind(deleted_by)
    .bind(owner)
    .bind(slot)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(not_found(owner, slot));
    }

    debug!(owner, slot, "undid last change");
    Ok(slot)
}

/// Reassign a slot (current version and its history) to `to_owner` at
/// that owner's next free slot, returning the new slot.
pub async fn move_character(
    pool: &SqlitePool,
    from_owner: &str,
    to_owner: &str,
    from_slot: Option<i64>,
) -> Result<i64> {
    let from_slot = resolve_slot(pool, from_owner, from_slot).await?;

    if get_character(pool, from_owner, Some(from_slot)).await?.is_none() {
        return Err(not_found(from_owner, from_slot));
    }

    let to_slot = next_free_slot(pool, to_owner).await?;

    sqlx::query(
        r#"
        UPDATE characters
        SET owner = ?, slot = ?
        WHERE owner = ? AND slot = ?
        "#,
    )
    .bind(to_owner)
    .bind(to_slot)
    .bind(from_owner)
    .bind(from_slot)
    .execute(pool)
    .await?;

    debug!(from_owner, from_slot, to_owner, to_slot, "moved character");
    Ok(to_slot)
}

/// All visible sheets of one owner, ordered by slot.
pub async fn characters_for_owner(pool: &SqlitePool, owner: &str) -> Result<Vec<Character>> {
    let rows = sqlx::query_as::<_, Character>(
        r#"
        SELECT c.id, c.owner, c.slot, c.text, c.creator, c.created_at,
               c.deleted_by, c.deleted_at
        FROM characters c
        WHERE c.owner = ? AND c.deleted_at IS NULL
          AND c.id = (
              SELECT c2.id FROM characters c2
              WHERE c2.owner = c.owner AND c2.slot = c.slot AND c2.deleted_at IS NULL
              ORDER BY c2.created_at DESC, c2.id DESC
              LIMIT 1
          )
        ORDER BY c.slot
        "#,
    )
    .bind(owner)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// One page of the owner roster, most recently changed first.
///
/// Fetches `page_size + 1` rows; the returned flag reports whether more
/// rows exist beyond this page. Pages are 1-based.
pub async fn list_owners_page(
    pool: &SqlitePool,
    page: i64,
    page_size: i64,
) -> Result<(Vec<OwnerSummary>, bool)> {
    let page = page.max(1);
    let mut rows = sqlx::query_as::<_, OwnerSummary>(
        r#"
        SELECT owner, COUNT(DISTINCT slot) AS sheet_count, MAX(created_at) AS last_change
        FROM characters
        WHERE deleted_at IS NULL
        GROUP BY owner
        ORDER BY last_change DESC, owner
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(page_size + 1)
    .bind((page - 1) * page_size)
    .fetch_all(pool)
    .await?;

    let has_more = rows.len() as i64 > page_size;
    rows.truncate(page_size as usize);
    Ok((rows, has_more))
}

/// Field-keyed search across visible sheets.
///
/// Candidates are narrowed with a substring match, then confirmed
/// against the sheet text: the value following a `{key}...:` field
/// label must start with `query` (ignoring case and punctuation).
/// Scoped to one owner when `owner` is given.
pub async fn search_characters(
    pool: &SqlitePool,
    query: &str,
    key: &str,
    owner: Option<&str>,
) -> Result<Vec<Character>> {
    let like = format!("%{query}%");

    let rows = match owner {
        Some(owner) => {
            sqlx::query_as::<_, Character>(
                r#"
                SELECT c.id, c.owner, c.slot, c.text, c.creator, c.created_at,
                       c.deleted_by, c.deleted_at
                FROM characters c
                WHERE c.owner = ? AND c.deleted_at IS NULL AND c.text LIKE ?
                  AND c.id = (
                      SELECT c2.id FROM characters c2
                      WHERE c2.owner = c.owner AND c2.slot = c.slot AND c2.deleted_at IS NULL
                      ORDER BY c2.created_at DESC, c2.id DESC
                      LIMIT 1
                  )
                ORDER BY c.owner, c.slot
                "#,
            )
            .bind(owner)
            .bind(&like)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Character>(
                r#"
                SELECT c.id, c.owner, c.slot, c.text, c.creator, c.created_at,
                       c.deleted_by, c.deleted_at
                FROM characters c
                WHERE c.deleted_at IS NULL AND c.text LIKE ?
                  AND c.id = (
                      SELECT c2.id FROM characters c2
                      WHERE c2.owner = c.owner AND c2.slot = c.slot AND c2.deleted_at IS NULL
                      ORDER BY c2.created_at DESC, c2.id DESC
                      LIMIT 1
                  )
                ORDER BY c.owner, c.slot
                "#,
            )
            .bind(&like)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(rows
        .into_iter()
        .filter(|c| matches_field(&c.text, key, query))
        .collect())
}

/// Search one owner's sheets by the `name` field.
pub async fn find_by_name(pool: &SqlitePool, name: &str, owner: &str) -> Result<Vec<Character>> {
    search_characters(pool, name, "name", Some(owner)).await
}

/// Confirm that `text` contains a `{key}...:` field whose value starts
/// with `query`, ignoring case. Letters between the colon and the query
/// reject the match, so `query` must lead the field value.
fn matches_field(text: &str, key: &str, query: &str) -> bool {
    let pattern = format!(
        r"(?im){}(.*?):[^a-z]*?{}",
        regex::escape(key),
        regex::escape(query)
    );
    match regex::Regex::new(&pattern) {
        Ok(re) => re.is_match(text),
        Err(_) => false,
    }
}

async fn resolve_slot(pool: &SqlitePool, owner: &str, slot: Option<i64>) -> Result<i64> {
    match slot {
        Some(slot) => Ok(slot),
        None => first_slot(pool, owner)
            .await?
            .ok_or_else(|| not_found(owner, MIN_SLOT)),
    }
}

fn not_found(owner: &str, slot: i64) -> DatabaseError {
    DatabaseError::NotFound {
        entity: "Character",
        id: format!("{owner}/{slot}"),
    }
}
