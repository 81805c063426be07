//! Resolve and render one character sheet.
//!
//! Accepts an owner, a slot, a sheet name, or combinations thereof:
//! `show`, `show 2`, `show @bob`, `show @bob 2`, `show Gandalf`,
//! `show @bob Gandalf`.

use bot_core::{IncomingMessage, OutgoingMessage};
use database::{character, Character};

use crate::args::{parse_slot, parse_user, split_args};
use crate::context::{CommandContext, CommandOutcome};
use crate::error::{CommandError, Result};
use crate::key::CommandKey;
use crate::render::{command_for_target, render_character};

pub async fn execute(
    ctx: &mut CommandContext<'_>,
    msg: &IncomingMessage,
    raw_remainder: &str,
) -> Result<CommandOutcome> {
    let parts = split_args(raw_remainder, 2);

    if parts.len() == 2 && parts[0].starts_with('@') {
        let owner = parse_user(parts[0]).ok_or(CommandError::Malformed)?;
        return match parse_slot(parts[1]) {
            Some(slot) => direct(ctx, msg, &owner, Some(slot)).await,
            None => named(ctx, msg, &owner, parts[1].trim()).await,
        };
    }

    if parts.len() == 1 {
        if let Some(slot) = parse_slot(parts[0]) {
            return direct(ctx, msg, &msg.sender, Some(slot)).await;
        }
        if parts[0].starts_with('@') {
            let owner = parse_user(parts[0]).ok_or(CommandError::Malformed)?;
            return direct(ctx, msg, &owner, None).await;
        }
    }

    if !parts.is_empty() {
        return named(ctx, msg, &msg.sender, raw_remainder.trim()).await;
    }

    direct(ctx, msg, &msg.sender, None).await
}

/// Render a sheet addressed by (owner, slot).
async fn direct(
    ctx: &mut CommandContext<'_>,
    msg: &IncomingMessage,
    owner: &str,
    slot: Option<i64>,
) -> Result<CommandOutcome> {
    match character::get_character(ctx.db.pool(), owner, slot).await? {
        Some(view) => {
            let (messages, state) = render_character(ctx, msg, &view).await?;
            Ok(CommandOutcome::messages(messages).with_state(state))
        }
        None => {
            let body = match slot {
                Some(slot) => format!("No data found for character {slot} of user @{owner}."),
                None => format!("No data found for user @{owner}."),
            };
            Ok(CommandOutcome::message(
                OutgoingMessage::reply_to(msg, body).with_keyboard(vec![ctx.list_label()]),
            ))
        }
    }
}

/// Render a sheet addressed by name, via the name-field search.
async fn named(
    ctx: &mut CommandContext<'_>,
    msg: &IncomingMessage,
    owner: &str,
    name: &str,
) -> Result<CommandOutcome> {
    let hits = character::find_by_name(ctx.db.pool(), name, owner).await?;

    match hits.len() {
        0 => {
            let body = format!("No character named {name} found for user @{owner}.");
            Ok(CommandOutcome::message(
                OutgoingMessage::reply_to(msg, body).with_keyboard(vec![ctx.list_label()]),
            ))
        }
        1 => direct(ctx, msg, owner, Some(hits[0].slot)).await,
        count => {
            let body =
                format!("Found {count} characters named {name} for user @{owner}.");
            let keyboard = show_keyboard(ctx, msg, &hits);
            Ok(CommandOutcome::message(
                OutgoingMessage::reply_to(msg, body).with_keyboard(keyboard),
            ))
        }
    }
}

/// One `show` suggestion per hit, plus the list command.
pub(super) fn show_keyboard(
    ctx: &CommandContext<'_>,
    msg: &IncomingMessage,
    hits: &[Character],
) -> Vec<String> {
    let mut keyboard: Vec<String> = hits
        .iter()
        .map(|hit| {
            command_for_target(
                ctx.registry,
                ctx.locale(),
                CommandKey::Show,
                &msg.sender,
                &hit.owner,
                Some(hit.slot),
                false,
            )
        })
        .collect();
    keyboard.push(ctx.list_label());
    keyboard
}
