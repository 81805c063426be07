//! Reassign a sheet to another owner.

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
    let parts = split_args(raw_remainder, 3);
    if parts.len() < 2 || !parts[0].starts_with('@') || !parts[1].starts_with('@') {
        return Err(CommandError::Malformed);
    }

    let from = parse_user(parts[0]).ok_or(CommandError::Malformed)?;
    let to = parse_user(parts[1]).ok_or(CommandError::Malformed)?;
    let slot = match parts.get(2) {
        Some(token) => Some(parse_slot(token).ok_or(CommandError::Malformed)?),
        None => None,
    };

    let own = from == msg.sender;
    if !own && !ctx.config.is_admin(&msg.sender) {
        let body = "You cannot move other users' characters.";
        return Ok(CommandOutcome::message(
            OutgoingMessage::reply_to(msg, body).with_keyboard(vec![ctx.list_label()]),
        ));
    }

    let to_slot = character::move_character(ctx.db.pool(), &from, &to, slot).await?;

    let body = match (own, slot) {
        (true, Some(slot)) if slot > character::MIN_SLOT => format!(
            "You successfully moved your character {slot} to @{to} (now character {to_slot})."
        ),
        (true, _) => {
            format!("You successfully moved your character to @{to} (now character {to_slot}).")
        }
        (false, Some(slot)) if slot > character::MIN_SLOT => format!(
            "You successfully moved character {slot} of @{from} to @{to} (now character {to_slot})."
        ),
        (false, _) => format!(
            "You successfully moved the character of @{from} to @{to} (now character {to_slot})."
        ),
    };

    let locale = ctx.locale();
    let mut keyboard = vec![command_for_target(
        ctx.registry,
        locale,
        CommandKey::Show,
        &msg.sender,
        &to,
        Some(to_slot),
        false,
    )];
    if own {
        keyboard.push(command_for_target(
            ctx.registry,
            locale,
            CommandKey::SetPicture,
            &msg.sender,
            &to,
            Some(to_slot),
            false,
        ));
        keyboard.push(command_for_target(
            ctx.registry,
            locale,
            CommandKey::Delete,
            &msg.sender,
            &to,
            Some(to_slot),
            true,
        ));
    }
    keyboard.push(ctx.list_label());

    Ok(CommandOutcome::message(
        OutgoingMessage::reply_to(msg, body).with_keyboard(keyboard),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{self, test_ctx};

    #[tokio::test]
    async fn own_sheet_moves_to_target_next_slot() {
        let db = testutil::db().await;
        character::add_character(db.pool(), "alice", "alice", "mine").await.unwrap();
        character::add_character(db.pool(), "bob", "bob", "his").await.unwrap();

        test_ctx!(ctx, &db);
        let msg = testutil::msg("alice", "move @alice @bob");
        let outcome = execute(&mut ctx, &msg, "@alice @bob").await.unwrap();

        assert!(outcome.messages[0].body.contains("now character 2"));
        let view = character::get_character(db.pool(), "bob", Some(2))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(view.text, "mine");
    }

    #[tokio::test]
    async fn moving_someone_elses_sheet_requires_admin() {
        let db = testutil::db().await;
        character::add_character(db.pool(), "bob", "bob", "his").await.unwrap();

        test_ctx!(ctx, &db);
        let msg = testutil::msg("alice", "move @bob @carol");
        let outcome = execute(&mut ctx, &msg, "@bob @carol").await.unwrap();
        assert!(outcome.messages[0].body.contains("cannot move"));
        assert!(character::get_character(db.pool(), "carol", None)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn admin_may_move_any_sheet() {
        let db = testutil::db().await;
        character::add_character(db.pool(), "bob", "bob", "his").await.unwrap();

        test_ctx!(ctx, &db, admins = &["alice"]);
        let msg = testutil::msg("alice", "move @bob @carol");
        let outcome = execute(&mut ctx, &msg, "@bob @carol").await.unwrap();

        assert!(outcome.messages[0].body.contains("character of @bob"));
        assert!(character::get_character(db.pool(), "carol", None)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn missing_target_is_malformed() {
        let db = testutil::db().await;
        test_ctx!(ctx, &db);
        let msg = testutil::msg("alice", "move @bob");

        assert!(matches!(
            execute(&mut ctx, &msg, "@bob").await,
            Err(CommandError::Malformed)
        ));
        assert!(matches!(
            execute(&mut ctx, &msg, "@a @b junk").await,
            Err(CommandError::Malformed)
        ));
    }
}
