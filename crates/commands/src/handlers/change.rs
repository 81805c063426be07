//! Append a new version to an existing sheet.

use bot_core::{IncomingMessage, OutgoingMessage};
use database::character;

use crate::args::{parse_slot, parse_user, split_args};
use crate::context::{CommandContext, CommandOutcome};
use crate::error::{CommandError, Result};
use crate::key::CommandKey;
use crate::render::command_for_target;

pub async fn execute(
    ctx: &mut CommandContext<'_>,
    msg: &IncomingMessage,
    raw_remainder: &str,
) -> Result<CommandOutcome> {
    let three = split_args(raw_remainder, 3);
    let two = split_args(raw_remainder, 2);

    // change @owner <slot> <text>
    if three.len() == 3 && three[0].starts_with('@') && parse_slot(three[1]).is_some() {
        let owner = parse_user(three[0]).ok_or(CommandError::Malformed)?;
        let slot = parse_slot(three[1]).ok_or(CommandError::Malformed)?;
        let text = three[2].trim();
        if text.is_empty() {
            return Err(CommandError::Malformed);
        }

        if !ctx.check_auth(msg, Some(&owner), false).await? {
            return Ok(CommandOutcome::message(ctx.refusal(msg)));
        }

        character::change_character(ctx.db.pool(), &owner, Some(slot), &msg.sender, text).await?;
        let body = format!("All right! Character {slot} for @{owner} was saved.");
        return Ok(reply(ctx, msg, &owner, Some(slot), body));
    }

    // change <slot> <text> (own sheet)
    if two.len() == 2 && parse_slot(two[0]).is_some() && !two[1].trim().is_empty() {
        let slot = parse_slot(two[0]).ok_or(CommandError::Malformed)?;
        let text = two[1].trim();

        character::change_character(ctx.db.pool(), &msg.sender, Some(slot), &msg.sender, text)
            .await?;
        let body = format!("All right! Your character {slot} was saved.");
        return Ok(reply(ctx, msg, &msg.sender, Some(slot), body));
    }

    // change @owner <text> (owner's default sheet)
    if two.len() == 2 && two[0].starts_with('@') && !two[1].trim().is_empty() {
        let owner = parse_user(two[0]).ok_or(CommandError::Malformed)?;
        let text = two[1].trim();

        if !ctx.check_auth(msg, Some(&owner), false).await? {
            return Ok(CommandOutcome::message(ctx.refusal(msg)));
        }

        character::change_character(ctx.db.pool(), &owner, None, &msg.sender, text).await?;
        let body = format!("All right! The character of @{owner} was saved.");
        return Ok(reply(ctx, msg, &owner, None, body));
    }

    // change <text> (own default sheet)
    if !two.is_empty() && !two[0].starts_with('@') {
        character::change_character(
            ctx.db.pool(),
            &msg.sender,
            None,
            &msg.sender,
            raw_remainder.trim(),
        )
        .await?;
        let body = "All right! Your character was saved.".to_string();
        return Ok(reply(ctx, msg, &msg.sender, None, body));
    }

    Err(CommandError::Malformed)
}

fn reply(
    ctx: &CommandContext<'_>,
    msg: &IncomingMessage,
    owner: &str,
    slot: Option<i64>,
    body: String,
) -> CommandOutcome {
    let locale = ctx.locale();
    let keyboard = vec![
        command_for_target(ctx.registry, locale, CommandKey::Show, &msg.sender, owner, slot, false),
        command_for_target(
            ctx.registry,
            locale,
            CommandKey::SetPicture,
            &msg.sender,
            owner,
            slot,
            false,
        ),
        command_for_target(
            ctx.registry,
            locale,
            CommandKey::DeleteLast,
            &msg.sender,
            owner,
            slot,
            true,
        ),
        ctx.list_label(),
    ];

    CommandOutcome::message(OutgoingMessage::reply_to(msg, body).with_keyboard(keyboard))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{self, test_ctx};
    use database::DatabaseError;

    #[tokio::test]
    async fn change_extends_the_visible_version() {
        let db = testutil::db().await;
        character::add_character(db.pool(), "alice", "alice", "v1").await.unwrap();

        test_ctx!(ctx, &db);
        let msg = testutil::msg("alice", "change v2");
        let outcome = execute(&mut ctx, &msg, "v2").await.unwrap();
        assert!(outcome.messages[0].body.contains("saved"));

        let view = character::get_character(db.pool(), "alice", None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(view.text, "v2");
    }

    #[tokio::test]
    async fn change_on_missing_slot_is_not_found() {
        let db = testutil::db().await;
        test_ctx!(ctx, &db);
        let msg = testutil::msg("alice", "change 2 text");

        let result = execute(&mut ctx, &msg, "2 text").await;
        assert!(matches!(result, Err(CommandError::NotFound)));

        // The database itself reports the same condition.
        let raw = character::change_character(db.pool(), "alice", Some(2), "alice", "x").await;
        assert!(matches!(raw, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn change_for_other_owner_needs_grant() {
        let db = testutil::db().await;
        character::add_character(db.pool(), "bob", "bob", "v1").await.unwrap();

        test_ctx!(ctx, &db);
        let msg = testutil::msg("alice", "change @bob v2");
        let outcome = execute(&mut ctx, &msg, "@bob v2").await.unwrap();
        assert!(outcome.messages[0].body.contains("not allowed"));

        let view = character::get_character(db.pool(), "bob", None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(view.text, "v1");
    }
}
