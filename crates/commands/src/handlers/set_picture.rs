//! Arm the picture flow for a sheet.
//!
//! The command itself only stores which (owner, slot) the next picture
//! from this user is meant for; the dispatcher's picture path does the
//! actual download and storage.

use bot_core::{IncomingMessage, OutgoingMessage};
use database::ConversationState;

use crate::args::{parse_slot, parse_user, split_args};
use crate::context::{CommandContext, CommandOutcome};
use crate::error::{CommandError, Result};

pub async fn execute(
    ctx: &mut CommandContext<'_>,
    msg: &IncomingMessage,
    raw_remainder: &str,
) -> Result<CommandOutcome> {
    let parts = split_args(raw_remainder, 2);

    let (owner, slot) = if parts.len() == 2 && parts[0].starts_with('@') {
        let owner = parse_user(parts[0]).ok_or(CommandError::Malformed)?;
        let slot = parse_slot(parts[1]).ok_or(CommandError::Malformed)?;
        (owner, Some(slot))
    } else if parts.len() == 1 && parse_slot(parts[0]).is_some() {
        (msg.sender.clone(), parse_slot(parts[0]))
    } else if parts.len() == 1 && parts[0].starts_with('@') {
        let owner = parse_user(parts[0]).ok_or(CommandError::Malformed)?;
        (owner, None)
    } else {
        (msg.sender.clone(), None)
    };

    if !ctx.check_auth(msg, Some(&owner), false).await? {
        return Ok(CommandOutcome::message(ctx.refusal(msg)));
    }

    let body = format!(
        "All right! Now send the picture directly to @{}.",
        ctx.config.bot_username
    );

    Ok(
        CommandOutcome::message(OutgoingMessage::reply_to(msg, body)).with_state(
            ConversationState::AwaitingPicture { owner, slot },
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{self, test_ctx};

    #[tokio::test]
    async fn arms_awaiting_picture_for_own_default_slot() {
        let db = testutil::db().await;
        test_ctx!(ctx, &db);
        let msg = testutil::msg("alice", "set-picture");

        let outcome = execute(&mut ctx, &msg, "").await.unwrap();
        assert_eq!(
            outcome.state,
            ConversationState::AwaitingPicture {
                owner: "alice".to_string(),
                slot: None,
            }
        );
        assert!(outcome.messages[0].body.contains("send the picture"));
    }

    #[tokio::test]
    async fn arms_explicit_owner_and_slot_with_grant() {
        let db = testutil::db().await;
        database::auth::grant(db.pool(), "alice", "admin").await.unwrap();

        test_ctx!(ctx, &db);
        let msg = testutil::msg("alice", "set-picture @bob 2");
        let outcome = execute(&mut ctx, &msg, "@bob 2").await.unwrap();
        assert_eq!(
            outcome.state,
            ConversationState::AwaitingPicture {
                owner: "bob".to_string(),
                slot: Some(2),
            }
        );
    }

    #[tokio::test]
    async fn other_owner_without_grant_is_refused() {
        let db = testutil::db().await;
        test_ctx!(ctx, &db);
        let msg = testutil::msg("alice", "set-picture @bob");

        let outcome = execute(&mut ctx, &msg, "@bob").await.unwrap();
        assert!(outcome.messages[0].body.contains("not allowed"));
        assert_eq!(outcome.state, ConversationState::None);
    }
}
