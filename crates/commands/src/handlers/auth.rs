//! Grant and revoke authorization for acting on other owners' sheets.

use bot_core::{IncomingMessage, OutgoingMessage};
use database::auth;

use crate::args::{parse_user, split_args};
use crate::context::{CommandContext, CommandOutcome};
use crate::error::{CommandError, Result};

pub async fn execute_grant(
    ctx: &mut CommandContext<'_>,
    msg: &IncomingMessage,
    raw_remainder: &str,
) -> Result<CommandOutcome> {
    let target = parse_target(raw_remainder)?;

    // Granting requires standing of one's own; the group channel does
    // not bypass this.
    let allowed = ctx.check_auth(msg, None, false).await?;
    let granted = allowed && auth::grant(ctx.db.pool(), &target, &msg.sender).await?;

    let body = if granted {
        format!("You successfully authorized @{target}.")
    } else {
        format!(
            "The user @{target} could not be authorized.\n\n\
             Possible reasons:\n\
             1. The user is already authorized.\n\
             2. You are not allowed to authorize this user."
        )
    };

    Ok(CommandOutcome::message(OutgoingMessage::reply_to(msg, body)))
}

pub async fn execute_revoke(
    ctx: &mut CommandContext<'_>,
    msg: &IncomingMessage,
    raw_remainder: &str,
) -> Result<CommandOutcome> {
    let target = parse_target(raw_remainder)?;

    let allowed = ctx.check_auth(msg, None, false).await?;
    let revoked = allowed && auth::revoke(ctx.db.pool(), &target).await?;

    let body = if revoked {
        format!("You successfully unauthorized @{target}.")
    } else {
        format!(
            "The user @{target} could not be unauthorized.\n\n\
             You are not allowed to unauthorize this user."
        )
    };

    Ok(CommandOutcome::message(OutgoingMessage::reply_to(msg, body)))
}

fn parse_target(raw_remainder: &str) -> Result<String> {
    let parts = split_args(raw_remainder, 2);
    if parts.len() != 1 {
        return Err(CommandError::Malformed);
    }
    parse_user(parts[0]).ok_or(CommandError::Malformed)
}
