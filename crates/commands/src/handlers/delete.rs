//! Soft-delete a sheet, or undo its last edit.
//!
//! `delete` vacates the whole slot; `delete-last` hides only the most
//! recent version, re-exposing the one before it.

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
    undo_only: bool,
) -> Result<CommandOutcome> {
    let parts = split_args(raw_remainder, 2);
    if parts.is_empty() || !parts[0].starts_with('@') {
        return Err(CommandError::Malformed);
    }

    let owner = parse_user(parts[0]).ok_or(CommandError::Malformed)?;
    let slot = match parts.get(1) {
        Some(token) => Some(parse_slot(token).ok_or(CommandError::Malformed)?),
        None => None,
    };

    let own = owner == msg.sender;
    if !own && !ctx.config.is_admin(&msg.sender) {
        let body = "You cannot delete other users' characters.";
        return Ok(CommandOutcome::message(
            OutgoingMessage::reply_to(msg, body).with_keyboard(vec![ctx.list_label()]),
        ));
    }

    let body = if undo_only {
        character::undo_last_change(ctx.db.pool(), &owner, slot, &msg.sender).await?;
        match (own, slot) {
            (true, Some(slot)) => {
                format!("You successfully deleted the last change of character {slot}.")
            }
            (true, None) => "You successfully deleted the last change.".to_string(),
            (false, Some(slot)) => format!(
                "You successfully deleted the last change of character {slot} of @{owner}."
            ),
            (false, None) => {
                format!("You successfully deleted the last change of the character of @{owner}.")
            }
        }
    } else {
        character::remove_character(ctx.db.pool(), &owner, slot, &msg.sender).await?;
        match (own, slot) {
            (true, Some(slot)) => format!("You successfully deleted your character {slot}."),
            (true, None) => "You successfully deleted your character.".to_string(),
            (false, Some(slot)) => {
                format!("You successfully deleted character {slot} of @{owner}.")
            }
            (false, None) => format!("You successfully deleted the character of @{owner}."),
        }
    };

    let mut keyboard = vec![ctx.list_label()];
    if undo_only {
        // The surviving version can be inspected right away.
        keyboard.push(command_for_target(
            ctx.registry,
            ctx.locale(),
            CommandKey::Show,
            &msg.sender,
            &owner,
            slot,
            false,
        ));
    }

    Ok(CommandOutcome::message(
        OutgoingMessage::reply_to(msg, body).with_keyboard(keyboard),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{self, test_ctx};

    #[tokio::test]
    async fn delete_vacates_and_undo_steps_back() {
        let db = testutil::db().await;
        character::add_character(db.pool(), "alice", "alice", "v1").await.unwrap();
        character::change_character(db.pool(), "alice", Some(1), "alice", "v2")
            .await
            .unwrap();

        test_ctx!(ctx, &db);
        let msg = testutil::msg("alice", "delete-last @alice");
        execute(&mut ctx, &msg, "@alice", true).await.unwrap();

        let view = character::get_character(db.pool(), "alice", None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(view.text, "v1");

        let msg = testutil::msg("alice", "delete @alice");
        let outcome = execute(&mut ctx, &msg, "@alice", false).await.unwrap();
        assert!(outcome.messages[0].body.contains("deleted your character"));
        assert!(character::get_character(db.pool(), "alice", None)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn deleting_for_others_requires_admin() {
        let db = testutil::db().await;
        character::add_character(db.pool(), "bob", "bob", "v1").await.unwrap();

        test_ctx!(ctx, &db);
        let msg = testutil::msg("alice", "delete @bob");
        let outcome = execute(&mut ctx, &msg, "@bob", false).await.unwrap();
        assert!(outcome.messages[0].body.contains("cannot delete"));
        assert!(character::get_character(db.pool(), "bob", None)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn admin_deletes_with_attribution() {
        let db = testutil::db().await;
        character::add_character(db.pool(), "bob", "bob", "v1").await.unwrap();

        test_ctx!(ctx, &db, admins = &["alice"]);
        let msg = testutil::msg("alice", "delete @bob 1");
        let outcome = execute(&mut ctx, &msg, "@bob 1", false).await.unwrap();
        assert!(outcome.messages[0].body.contains("character 1 of @bob"));
    }

    #[tokio::test]
    async fn missing_at_prefix_is_malformed() {
        let db = testutil::db().await;
        test_ctx!(ctx, &db);
        let msg = testutil::msg("alice", "delete bob");

        assert!(matches!(
            execute(&mut ctx, &msg, "bob", false).await,
            Err(CommandError::Malformed)
        ));
    }
}
