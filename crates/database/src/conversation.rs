//! Per-user conversation state.
//!
//! One row per user, overwritten on every dispatch (last-write-wins,
//! including back to [`ConversationState::None`]). Payloads never
//! accumulate and never expire: a stale replay payload stays valid
//! until the user's next message replaces it.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};

/// Command templates armed for glyph replay.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayTemplates {
    /// Command to run when the user sends the left-arrow glyph.
    pub left: Option<String>,
    /// Command to run when the user sends the right-arrow glyph.
    pub right: Option<String>,
    /// Command to run when the user sends the redo glyph.
    pub redo: Option<String>,
    /// Template with a `{}` placeholder, filled with the text after a
    /// bare `@` reply.
    pub assign_owner_template: Option<String>,
}

impl ReplayTemplates {
    /// Whether no template is armed.
    pub fn is_empty(&self) -> bool {
        self.left.is_none()
            && self.right.is_none()
            && self.redo.is_none()
            && self.assign_owner_template.is_none()
    }
}

/// Conversation state of a single user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConversationState {
    /// No pending interaction.
    #[default]
    None,
    /// The next picture from this user is stored for (owner, slot).
    AwaitingPicture { owner: String, slot: Option<i64> },
    /// Glyph replies are expanded using the armed templates.
    DynamicReplay(ReplayTemplates),
}

impl ConversationState {
    /// Numeric status code stored alongside the payload.
    pub fn status_code(&self) -> i64 {
        match self {
            ConversationState::None => 0,
            ConversationState::AwaitingPicture { .. } => 1,
            ConversationState::DynamicReplay(_) => 2,
        }
    }

    /// Wrap templates, collapsing an empty set to `None`.
    pub fn replay(templates: ReplayTemplates) -> Self {
        if templates.is_empty() {
            ConversationState::None
        } else {
            ConversationState::DynamicReplay(templates)
        }
    }
}

/// Read the current state for `user_id`, defaulting to `None`.
pub async fn get_state(pool: &SqlitePool, user_id: &str) -> Result<ConversationState> {
    let payload = sqlx::query_scalar::<_, Option<String>>(
        r#"
        SELECT payload
        FROM conversation_state
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    match payload.flatten() {
        Some(raw) => {
            serde_json::from_str(&raw).map_err(|source| DatabaseError::CorruptPayload {
                entity: "ConversationState",
                id: user_id.to_string(),
                source,
            })
        }
        None => Ok(ConversationState::None),
    }
}

/// Overwrite the state for `user_id`.
pub async fn set_state(pool: &SqlitePool, user_id: &str, state: &ConversationState) -> Result<()> {
    let payload = serde_json::to_string(state).map_err(|source| DatabaseError::CorruptPayload {
        entity: "ConversationState",
        id: user_id.to_string(),
        source,
    })?;

    sqlx::query(
        r#"
        INSERT INTO conversation_state (user_id, status, payload)
        VALUES (?, ?, ?)
        ON CONFLICT(user_id) DO UPDATE SET
            status = excluded.status,
            payload = excluded.payload,
            updated_at = datetime('now')
        "#,
    )
    .bind(user_id)
    .bind(state.status_code())
    .bind(payload)
    .execute(pool)
    .await?;

    Ok(())
}
