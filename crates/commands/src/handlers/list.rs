//! Paginated roster of owners with sheets.

use bot_core::{glyphs, split_body, IncomingMessage, OutgoingMessage};
use database::{character, ConversationState, ReplayTemplates};

use crate::args::{parse_slot, split_args};
use crate::context::{CommandContext, CommandOutcome};
use crate::error::Result;
use crate::key::CommandKey;
use crate::render::{command_for_target, format_date};

/// Owners shown per page.
const PAGE_SIZE: i64 = 15;

pub async fn execute(
    ctx: &mut CommandContext<'_>,
    msg: &IncomingMessage,
    raw_remainder: &str,
) -> Result<CommandOutcome> {
    let page = split_args(raw_remainder, 1)
        .first()
        .and_then(|token| parse_slot(token))
        .unwrap_or(1)
        .max(1);

    if !ctx.check_auth(msg, None, true).await? {
        return Ok(CommandOutcome::message(ctx.refusal(msg)));
    }

    let (owners, has_more) = character::list_owners_page(ctx.db.pool(), page, PAGE_SIZE).await?;

    let mut body = format!("List of all users with characters:\n--- Page {page} ---\n");
    let mut number = (page - 1) * PAGE_SIZE + 1;
    for owner in &owners {
        body.push_str(&format!(
            "\n\n{number}.: @{}\nCharacters: {}\nLast change: {}",
            owner.owner,
            owner.sheet_count,
            format_date(owner.last_change),
        ));
        number += 1;
    }

    let list_text = ctx
        .registry
        .text_for(CommandKey::List, ctx.locale())
        .unwrap_or_default();

    let mut templates = ReplayTemplates::default();
    let mut keyboard = Vec::new();
    if page != 1 {
        templates.left = Some(format!("{list_text} {}", page - 1));
        keyboard.push(glyphs::LEFT.to_string());
    }
    if has_more {
        templates.right = Some(format!("{list_text} {}", page + 1));
        keyboard.push(glyphs::RIGHT.to_string());
    }

    if !templates.is_empty() {
        body.push_str(&format!(
            "\n\n(More pages: {} and {} to navigate)",
            glyphs::LEFT,
            glyphs::RIGHT
        ));
    }

    keyboard.extend(owners.iter().map(|owner| {
        command_for_target(
            ctx.registry,
            ctx.locale(),
            CommandKey::Show,
            &msg.sender,
            &owner.owner,
            None,
            true,
        )
    }));

    let messages = split_body(&body)
        .into_iter()
        .map(|chunk| OutgoingMessage::reply_to(msg, chunk).with_keyboard(keyboard.clone()))
        .collect();

    Ok(CommandOutcome::messages(messages).with_state(ConversationState::replay(templates)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{self, test_ctx};

    async fn seed_owners(db: &database::Database, count: usize) {
        for i in 0..count {
            character::add_character(db.pool(), &format!("user{i:02}"), "creator", "sheet")
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn first_page_arms_only_the_right_glyph() {
        let db = testutil::db().await;
        seed_owners(&db, 16).await;

        test_ctx!(ctx, &db, admins = &["alice"]);
        let msg = testutil::msg("alice", "list");
        let outcome = execute(&mut ctx, &msg, "").await.unwrap();

        match &outcome.state {
            ConversationState::DynamicReplay(templates) => {
                assert_eq!(templates.left, None);
                assert_eq!(templates.right, Some("list 2".to_string()));
            }
            other => panic!("expected replay state, got {other:?}"),
        }
        assert!(outcome.messages[0].body.contains("--- Page 1 ---"));
        assert!(outcome.messages[0].body.contains("1.: @"));
    }

    #[tokio::test]
    async fn last_page_arms_only_the_left_glyph() {
        let db = testutil::db().await;
        seed_owners(&db, 16).await;

        test_ctx!(ctx, &db, admins = &["alice"]);
        let msg = testutil::msg("alice", "list 2");
        let outcome = execute(&mut ctx, &msg, "2").await.unwrap();

        match &outcome.state {
            ConversationState::DynamicReplay(templates) => {
                assert_eq!(templates.left, Some("list 1".to_string()));
                assert_eq!(templates.right, None);
            }
            other => panic!("expected replay state, got {other:?}"),
        }
        // Numbering continues across pages.
        assert!(outcome.messages[0].body.contains("16.: @"));
    }

    #[tokio::test]
    async fn single_page_arms_nothing() {
        let db = testutil::db().await;
        seed_owners(&db, 3).await;

        test_ctx!(ctx, &db, admins = &["alice"]);
        let msg = testutil::msg("alice", "list");
        let outcome = execute(&mut ctx, &msg, "").await.unwrap();
        assert_eq!(outcome.state, ConversationState::None);
    }

    #[tokio::test]
    async fn keyboard_offers_show_per_listed_owner() {
        let db = testutil::db().await;
        seed_owners(&db, 2).await;

        test_ctx!(ctx, &db, admins = &["alice"]);
        let msg = testutil::msg("alice", "list");
        let outcome = execute(&mut ctx, &msg, "").await.unwrap();

        let keyboard = &outcome.messages[0].keyboard;
        assert!(keyboard.contains(&"show @user00".to_string()));
        assert!(keyboard.contains(&"show @user01".to_string()));
    }
}
