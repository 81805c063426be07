//! Field-keyed search across all sheets.
//!
//! `search Gandalf` looks for the name field; `search age: 300`
//! searches any other field by prefixing the query with its label.

use bot_core::{IncomingMessage, OutgoingMessage};
use database::character;

use crate::context::{CommandContext, CommandOutcome};
use crate::error::{CommandError, Result};
use crate::handlers::show::show_keyboard;
use crate::render::render_character;

pub async fn execute(
    ctx: &mut CommandContext<'_>,
    msg: &IncomingMessage,
    raw_remainder: &str,
) -> Result<CommandOutcome> {
    let input = raw_remainder.trim();
    if input.is_empty() {
        return Err(CommandError::Malformed);
    }

    if !ctx.check_auth(msg, None, true).await? {
        return Ok(CommandOutcome::message(ctx.refusal(msg)));
    }

    let (key, query) = split_query(input);
    let hits = character::search_characters(ctx.db.pool(), query, &key, None).await?;

    match hits.len() {
        0 => Ok(CommandOutcome::message(
            OutgoingMessage::reply_to(msg, "No characters were found for this search.")
                .with_keyboard(vec![ctx.list_label()]),
        )),
        1 => {
            match character::get_character(ctx.db.pool(), &hits[0].owner, Some(hits[0].slot))
                .await?
            {
                Some(view) => {
                    let (messages, state) = render_character(ctx, msg, &view).await?;
                    Ok(CommandOutcome::messages(messages).with_state(state))
                }
                None => Err(CommandError::NotFound),
            }
        }
        _ => {
            let keyboard = show_keyboard(ctx, msg, &hits);
            Ok(CommandOutcome::message(
                OutgoingMessage::reply_to(
                    msg,
                    "Several characters match your search.",
                )
                .with_keyboard(keyboard),
            ))
        }
    }
}

/// Split `field: value` input into (field, value); everything else
/// searches the name field.
fn split_query(input: &str) -> (String, &str) {
    if let Some((key, value)) = input.split_once(':') {
        let key = key.trim();
        let value = value.trim();
        if !key.is_empty() && !value.is_empty() && !key.contains(char::is_whitespace) {
            return (key.to_lowercase(), value);
        }
    }
    ("name".to_string(), input)
}
