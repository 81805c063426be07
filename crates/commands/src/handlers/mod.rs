//! Command handlers, one module per command family.
//!
//! Dispatch is an exhaustive match over [`CommandKey`], so a key
//! without a handler fails at build time.

pub mod add;
pub mod auth;
pub mod change;
pub mod delete;
pub mod list;
pub mod move_char;
pub mod roll;
pub mod search;
pub mod set_picture;
pub mod show;
pub mod static_admin;
pub mod static_reply;
pub mod template;

use bot_core::IncomingMessage;

use crate::context::{CommandContext, CommandOutcome};
use crate::error::Result;
use crate::key::CommandKey;

pub use roll::RollKind;

/// Invoke the handler for `key`.
///
/// `token` is the typed command token (lowercased); `raw_remainder` is
/// everything after it with original casing preserved.
pub async fn dispatch(
    key: CommandKey,
    token: &str,
    ctx: &mut CommandContext<'_>,
    msg: &IncomingMessage,
    raw_remainder: &str,
) -> Result<CommandOutcome> {
    match key {
        CommandKey::Add => add::execute(ctx, msg, raw_remainder).await,
        CommandKey::Change => change::execute(ctx, msg, raw_remainder).await,
        CommandKey::SetPicture => set_picture::execute(ctx, msg, raw_remainder).await,
        CommandKey::Show => show::execute(ctx, msg, raw_remainder).await,
        CommandKey::Move => move_char::execute(ctx, msg, raw_remainder).await,
        CommandKey::Delete => delete::execute(ctx, msg, raw_remainder, false).await,
        CommandKey::DeleteLast => delete::execute(ctx, msg, raw_remainder, true).await,
        CommandKey::Search => search::execute(ctx, msg, raw_remainder).await,
        CommandKey::List => list::execute(ctx, msg, raw_remainder).await,
        CommandKey::Dice => roll::execute(ctx, msg, token, raw_remainder, RollKind::Dice).await,
        CommandKey::Coin => roll::execute(ctx, msg, token, raw_remainder, RollKind::Coin).await,
        CommandKey::Auth => auth::execute_grant(ctx, msg, raw_remainder).await,
        CommandKey::Unauth => auth::execute_revoke(ctx, msg, raw_remainder).await,
        CommandKey::SetCommand => static_admin::execute_set_command(ctx, msg, raw_remainder).await,
        CommandKey::SetCommandKeyboards => {
            static_admin::execute_set_keyboards(ctx, msg, raw_remainder).await
        }
        CommandKey::SetCommandAltCommands => {
            static_admin::execute_set_alt_commands(ctx, msg, raw_remainder).await
        }
        CommandKey::Template => template::execute_template(ctx, msg).await,
        CommandKey::MoreExamples => template::execute_more_examples(ctx, msg).await,
        CommandKey::Static => static_reply::execute(ctx, msg, token).await,
    }
}
