//! Core types shared across the sheet bot workspace.
//!
//! This crate is the leaf of the workspace: inbound/outbound message
//! types, bot configuration, and body splitting for transports with a
//! message size limit. It has no knowledge of storage or dispatch.

mod config;
pub mod glyphs;
mod message;
mod split;

pub use config::{BotConfig, ConfigError};
pub use message::{IncomingMessage, OutgoingMessage};
pub use split::split_body;
