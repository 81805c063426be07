//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One version of a character sheet.
///
/// Rows are append-only: edits insert a new version and deletions mark
/// versions with `deleted_at` instead of removing them. The visible
/// version of a slot is the newest row without a deletion mark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Character {
    /// Auto-incrementing row id.
    pub id: i64,
    /// User the sheet belongs to.
    pub owner: String,
    /// 1-based slot within the owner's sheets. Slot 1 is the default.
    pub slot: i64,
    /// Sheet body.
    pub text: String,
    /// User who wrote this version (may differ from the owner).
    pub creator: String,
    /// Creation timestamp (unix seconds).
    pub created_at: i64,
    /// User who deleted this version, if any.
    pub deleted_by: Option<String>,
    /// Deletion timestamp (unix seconds), if any.
    pub deleted_at: Option<i64>,
}

/// A visible character version annotated with its active neighbor slots,
/// used for left/right navigation.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct CharacterView {
    pub id: i64,
    pub owner: String,
    pub slot: i64,
    pub text: String,
    pub creator: String,
    pub created_at: i64,
    /// Nearest active slot below this one, scoped to the owner.
    pub prev_slot: Option<i64>,
    /// Nearest active slot above this one, scoped to the owner.
    pub next_slot: Option<i64>,
}

/// Aggregate row for the owner roster.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct OwnerSummary {
    pub owner: String,
    /// Number of active slots the owner has.
    pub sheet_count: i64,
    /// Timestamp of the owner's most recent version (unix seconds).
    pub last_change: i64,
}

/// One version of a character picture.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct CharacterPicture {
    pub id: i64,
    pub owner: String,
    pub slot: i64,
    /// Stored file name (relative to the configured picture directory).
    pub file_name: String,
    pub creator: String,
    pub created_at: i64,
    /// Moderation gate: pictures are hidden until confirmed.
    pub active: bool,
}

/// An admin-configurable canned reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct StaticMessage {
    /// Primary trigger, unique.
    pub command: String,
    /// Response template.
    pub response: String,
    /// JSON list of suggested-reply labels, if configured.
    pub response_keyboards: Option<String>,
    /// JSON list of additional trigger strings, if configured.
    pub alt_commands: Option<String>,
}

impl StaticMessage {
    /// Decode the configured keyboards, if any.
    pub fn keyboards(&self) -> Option<Vec<String>> {
        let raw = self.response_keyboards.as_deref()?;
        serde_json::from_str(raw).ok()
    }

    /// Decode the configured alternate triggers, if any.
    pub fn alternate_commands(&self) -> Option<Vec<String>> {
        let raw = self.alt_commands.as_deref()?;
        serde_json::from_str(raw).ok()
    }
}

/// An authorization grant allowing a user to act on other owners' sheets.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Authorization {
    pub user_id: String,
    pub granted_by: String,
    pub granted_at: i64,
}
