//! Command registry and handlers for the sheet bot.
//!
//! This crate owns the locale-aware command table, the closed
//! [`CommandKey`] set, and one handler per command. Handlers are plain
//! async functions invoked through an exhaustive match in
//! [`handlers::dispatch`]; they receive a [`CommandContext`] and return
//! a [`CommandOutcome`] carrying the replies plus the conversation
//! state to persist.

pub mod args;
pub mod context;
pub mod dice;
pub mod error;
pub mod handlers;
pub mod key;
pub mod registry;
pub mod render;
pub mod rng;

#[cfg(test)]
pub(crate) mod testutil;

pub use context::{CommandContext, CommandOutcome};
pub use error::CommandError;
pub use key::CommandKey;
pub use registry::{CommandRegistry, RegistryError, DEFAULT_LOCALE};
pub use rng::{RandomSource, ScriptedRandom, ThreadRandom};
