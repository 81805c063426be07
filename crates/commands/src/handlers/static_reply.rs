//! Canned replies and the unknown-command fallback.
//!
//! This is the registry's fallback handler: any token that resolves to
//! no other command lands here and is looked up in the canned-reply
//! table; a miss produces the "I don't know that command" reply.

use bot_core::{split_body, IncomingMessage, OutgoingMessage};
use database::static_message;

use crate::context::{CommandContext, CommandOutcome};
use crate::error::Result;
use crate::render::localize_first_token;

pub async fn execute(
    ctx: &mut CommandContext<'_>,
    msg: &IncomingMessage,
    token: &str,
) -> Result<CommandOutcome> {
    match static_message::get_static_message(ctx.db.pool(), token).await? {
        Some(reply) => {
            let keyboard: Vec<String> = reply
                .keyboards()
                .unwrap_or_else(|| vec!["help".to_string()])
                .iter()
                .map(|label| localize_first_token(ctx.registry, ctx.locale(), label))
                .collect();

            let body = expand_template(ctx, msg, token, &reply.response);

            let messages = split_body(&body)
                .into_iter()
                .map(|chunk| OutgoingMessage::reply_to(msg, chunk).with_keyboard(keyboard.clone()))
                .collect();

            Ok(CommandOutcome::messages(messages))
        }
        None => {
            let body = format!(
                "Sorry {}, I don't know the command '{token}'.",
                msg.display_name()
            );
            Ok(CommandOutcome::message(
                OutgoingMessage::reply_to(msg, body).with_keyboard(vec![ctx.help_label()]),
            ))
        }
    }
}

/// Fill the placeholders a canned reply may carry.
fn expand_template(
    ctx: &CommandContext<'_>,
    msg: &IncomingMessage,
    token: &str,
    template: &str,
) -> String {
    template
        .replace("{bot_username}", &ctx.config.bot_username)
        .replace("{group_tag}", &ctx.config.group_tag)
        .replace("{user_id}", &msg.sender)
        .replace("{user}", msg.display_name())
        .replace("{command}", token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{self, test_ctx};

    #[tokio::test]
    async fn seeded_help_renders_with_placeholders() {
        let db = testutil::db().await;
        test_ctx!(ctx, &db);
        let msg = testutil::msg("alice", "help");

        let outcome = execute(&mut ctx, &msg, "help").await.unwrap();
        let body = &outcome.messages[0].body;
        assert!(body.contains("#somegroup"));
        assert!(body.contains("@sheetbot"));
        assert!(!body.contains("{group_tag}"));
    }

    #[tokio::test]
    async fn alternate_trigger_reaches_the_reply() {
        let db = testutil::db().await;
        test_ctx!(ctx, &db);
        let msg = testutil::msg("alice", "?");

        let outcome = execute(&mut ctx, &msg, "?").await.unwrap();
        assert!(outcome.messages[0].body.contains("character sheets"));
    }

    #[tokio::test]
    async fn unknown_command_reports_politely() {
        let db = testutil::db().await;
        test_ctx!(ctx, &db);
        let msg = testutil::msg("alice", "frobnicate");

        let outcome = execute(&mut ctx, &msg, "frobnicate").await.unwrap();
        assert!(outcome.messages[0]
            .body
            .contains("I don't know the command 'frobnicate'"));
        assert_eq!(outcome.messages[0].keyboard, vec!["help".to_string()]);
    }

    #[tokio::test]
    async fn keyboards_are_localized() {
        let db = testutil::db().await;
        database::static_message::set_static_message(db.pool(), "motd", "Hi.")
            .await
            .unwrap();
        database::static_message::set_static_message_keyboards(
            db.pool(),
            "motd",
            &["show @bob".to_string(), "list".to_string()],
        )
        .await
        .unwrap();

        test_ctx!(ctx, &db);
        let msg = testutil::msg("alice", "motd");
        let outcome = execute(&mut ctx, &msg, "motd").await.unwrap();
        assert_eq!(
            outcome.messages[0].keyboard,
            vec!["show @bob".to_string(), "list".to_string()]
        );
    }
}
