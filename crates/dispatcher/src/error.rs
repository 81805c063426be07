//! Dispatch error types.

use database::DatabaseError;
use thiserror::Error;

/// Errors that abort a dispatch.
///
/// User-level command failures never surface here; they are rendered
/// into reply messages by the dispatcher. These are the
/// infrastructure failures that leave the message unanswered.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Storage failure.
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    /// The command table could not be built.
    #[error("registry error: {0}")]
    Registry(#[from] commands::RegistryError),

    /// Outbound transport failure.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Result type for dispatch operations.
pub type Result<T> = std::result::Result<T, DispatchError>;
