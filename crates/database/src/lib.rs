//! SQLite persistence layer for the sheet bot.
//!
//! This crate provides async database operations for character sheets,
//! pictures, conversation state, canned replies, and authorization
//! grants using SQLx with SQLite.
//!
//! # Example
//!
//! ```no_run
//! use database::{character, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:sheetbot.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Create a sheet at the owner's next free slot
//!     let slot = character::add_character(db.pool(), "alice", "alice", "First name: A").await?;
//!     assert_eq!(slot, 1);
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod character;
pub mod conversation;
pub mod error;
pub mod models;
pub mod picture;
pub mod static_message;

pub use conversation::{ConversationState, ReplayTemplates};
pub use error::{DatabaseError, Result};
pub use models::{
    Authorization, Character, CharacterPicture, CharacterView, OwnerSummary, StaticMessage,
};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    const DEFAULT_POOL_SIZE: u32 = 20;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist;
    /// `sqlite::memory:` gives an in-memory database for testing.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!("Connected to database: {} (pool size: {})", url, pool_size);

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema
    /// is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn migrations_apply_and_seed() {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();

        let seeded = static_message::all_static_messages(db.pool()).await.unwrap();
        let commands: Vec<&str> = seeded.iter().map(|m| m.command.as_str()).collect();
        assert!(commands.contains(&"help"));
        assert!(commands.contains(&"admin-help"));
        assert!(commands.contains(&"template-only"));
    }
}
