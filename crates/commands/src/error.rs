//! Command error types.

use database::DatabaseError;
use thiserror::Error;

/// Errors a command handler can report.
///
/// The first three are user-level outcomes: the dispatcher turns them
/// into reply messages and the dispatch still commits. Only `Database`
/// aborts the dispatch.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The argument shape matches no accepted pattern.
    #[error("malformed command arguments")]
    Malformed,

    /// The target owner/slot has no active record.
    #[error("target record not found")]
    NotFound,

    /// The actor lacks rights over the target.
    #[error("actor is not authorized")]
    Unauthorized,

    /// Underlying storage failure.
    #[error("database error: {0}")]
    Database(DatabaseError),
}

impl From<DatabaseError> for CommandError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { .. } => CommandError::NotFound,
            other => CommandError::Database(other),
        }
    }
}

/// Result type for command handlers.
pub type Result<T> = std::result::Result<T, CommandError>;
