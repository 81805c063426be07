//! Admin-configurable canned replies.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::StaticMessage;

/// Look up a canned reply by its primary trigger or by membership in
/// its alternate trigger list (both case-insensitive).
pub async fn get_static_message(pool: &SqlitePool, command: &str) -> Result<Option<StaticMessage>> {
    let alt_pattern = format!("%\"{command}\"%");

    let row = sqlx::query_as::<_, StaticMessage>(
        r#"
        SELECT command, response, response_keyboards, alt_commands
        FROM static_messages
        WHERE command LIKE ? OR alt_commands LIKE ?
        LIMIT 1
        "#,
    )
    .bind(command)
    .bind(&alt_pattern)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Create or replace the response for a canned reply.
pub async fn set_static_message(
    pool: &SqlitePool,
    command: &str,
    response: &str,
) -> Result<StaticMessage> {
    sqlx::query(
        r#"
        INSERT INTO static_messages (command, response)
        VALUES (?, ?)
        ON CONFLICT(command) DO UPDATE SET response = excluded.response
        "#,
    )
    .bind(command)
    .bind(response)
    .execute(pool)
    .await?;

    get_static_message(pool, command)
        .await?
        .ok_or_else(|| not_found(command))
}

/// Replace the suggested-reply keyboard of an existing canned reply.
pub async fn set_static_message_keyboards(
    pool: &SqlitePool,
    command: &str,
    keyboards: &[String],
) -> Result<StaticMessage> {
    let encoded = serde_json::to_string(keyboards).map_err(|source| {
        DatabaseError::CorruptPayload {
            entity: "StaticMessage",
            id: command.to_string(),
            source,
        }
    })?;

    let result = sqlx::query(
        r#"
        UPDATE static_messages
        SET response_keyboards = ?
        WHERE command LIKE ?
        "#,
    )
    .bind(&encoded)
    .bind(command)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(not_found(command));
    }

    get_static_message(pool, command)
        .await?
        .ok_or_else(|| not_found(command))
}

/// Replace the alternate trigger list of an existing canned reply.
pub async fn set_static_message_alt_commands(
    pool: &SqlitePool,
    command: &str,
    alt_commands: &[String],
) -> Result<StaticMessage> {
    let encoded = serde_json::to_string(alt_commands).map_err(|source| {
        DatabaseError::CorruptPayload {
            entity: "StaticMessage",
            id: command.to_string(),
            source,
        }
    })?;

    let result = sqlx::query(
        r#"
        UPDATE static_messages
        SET alt_commands = ?
        WHERE command LIKE ?
        "#,
    )
    .bind(&encoded)
    .bind(command)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(not_found(command));
    }

    get_static_message(pool, command)
        .await?
        .ok_or_else(|| not_found(command))
}

/// All canned replies, for admin listings.
pub async fn all_static_messages(pool: &SqlitePool) -> Result<Vec<StaticMessage>> {
    let rows = sqlx::query_as::<_, StaticMessage>(
        r#"
        SELECT command, response, response_keyboards, alt_commands
        FROM static_messages
        ORDER BY command
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

fn not_found(command: &str) -> DatabaseError {
    DatabaseError::NotFound {
        entity: "StaticMessage",
        id: command.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn test_db() -> Database {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn seeded_help_is_present() {
        let db = test_db().await;
        let help = get_static_message(db.pool(), "help").await.unwrap().unwrap();
        assert!(help.response.contains("character sheets"));
        assert_eq!(
            help.keyboards().unwrap(),
            vec!["list".to_string(), "template".to_string(), "rules".to_string()]
        );
    }

    #[tokio::test]
    async fn lookup_matches_alternate_triggers() {
        let db = test_db().await;
        // Seeded help carries ["?", "h"] as alternates.
        let by_alt = get_static_message(db.pool(), "?").await.unwrap().unwrap();
        assert_eq!(by_alt.command, "help");

        let by_case = get_static_message(db.pool(), "HELP").await.unwrap().unwrap();
        assert_eq!(by_case.command, "help");
    }

    #[tokio::test]
    async fn set_creates_and_updates() {
        let db = test_db().await;
        let created = set_static_message(db.pool(), "motd", "Welcome!").await.unwrap();
        assert_eq!(created.response, "Welcome!");
        assert!(created.keyboards().is_none());

        let updated = set_static_message(db.pool(), "motd", "Changed.").await.unwrap();
        assert_eq!(updated.response, "Changed.");
    }

    #[tokio::test]
    async fn keyboards_and_alts_require_existing_command() {
        let db = test_db().await;
        let kb = vec!["help".to_string()];
        let result = set_static_message_keyboards(db.pool(), "missing", &kb).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));

        set_static_message(db.pool(), "motd", "Welcome!").await.unwrap();
        let updated = set_static_message_keyboards(db.pool(), "motd", &kb).await.unwrap();
        assert_eq!(updated.keyboards().unwrap(), kb);

        let alts = vec!["welcome".to_string(), "hello".to_string()];
        let updated = set_static_message_alt_commands(db.pool(), "motd", &alts).await.unwrap();
        assert_eq!(updated.alternate_commands().unwrap(), alts);

        let by_alt = get_static_message(db.pool(), "hello").await.unwrap().unwrap();
        assert_eq!(by_alt.command, "motd");
    }
}
