//! Message dispatch for the sheet bot.
//!
//! Wires inbound messages through glyph rewriting, the command
//! registry, and the handlers, and persists the resulting conversation
//! state exactly once per message. The chat transport stays outside:
//! an embedding binary feeds [`IncomingMessage`]s in and pushes the
//! returned [`OutgoingMessage`]s through a [`MessageSender`].
//!
//! [`IncomingMessage`]: bot_core::IncomingMessage
//! [`OutgoingMessage`]: bot_core::OutgoingMessage

mod dispatcher;
mod error;
pub mod glyphs;
mod locks;
mod pictures;
mod sender;

pub use dispatcher::Dispatcher;
pub use error::{DispatchError, Result};
pub use locks::UserLocks;
pub use pictures::{FetchError, HttpPictureFetcher, PictureFetcher};
pub use sender::{LoggingSender, MessageSender, NoOpSender};
