//! Create a character sheet at the owner's next free slot.

use bot_core::{IncomingMessage, OutgoingMessage};
use database::{character, ConversationState, ReplayTemplates};

use crate::args::{parse_user, split_args};
use crate::context::{CommandContext, CommandOutcome};
use crate::error::{CommandError, Result};
use crate::key::CommandKey;
use crate::render::command_for_target;

/// Sender identifiers of this length are transport-assigned aliases,
/// not stable user ids; sheets added under them need reassignment.
const ALIAS_ID_LEN: usize = 52;

pub async fn execute(
    ctx: &mut CommandContext<'_>,
    msg: &IncomingMessage,
    raw_remainder: &str,
) -> Result<CommandOutcome> {
    let parts = split_args(raw_remainder, 2);

    // add @owner <text>
    if parts.len() == 2 && parts[0].starts_with('@') && !parts[1].trim().is_empty() {
        let owner = parse_user(parts[0]).ok_or(CommandError::Malformed)?;

        if !ctx.check_auth(msg, Some(&owner), false).await? {
            return Ok(CommandOutcome::message(ctx.refusal(msg)));
        }

        let slot =
            character::add_character(ctx.db.pool(), &owner, &msg.sender, parts[1].trim()).await?;

        let body = if slot == character::MIN_SLOT {
            format!("All right! The first character for @{owner} was added.")
        } else {
            format!("All right! Character {slot} for @{owner} was added.")
        };

        let reply = OutgoingMessage::reply_to(msg, body)
            .with_keyboard(added_keyboard(ctx, msg, &owner, slot));
        return Ok(CommandOutcome::message(reply));
    }

    // add <text> (own sheet)
    if !parts.is_empty() && !parts[0].starts_with('@') {
        let slot = character::add_character(
            ctx.db.pool(),
            &msg.sender,
            &msg.sender,
            raw_remainder.trim(),
        )
        .await?;

        if msg.sender.len() == ALIAS_ID_LEN {
            // The transport hid the real identity behind an alias: the
            // sheet is parked there, and the user's next "@name" reply
            // replays a move onto the real owner.
            return Ok(aliased_outcome(ctx, msg, slot));
        }

        let body = if slot == character::MIN_SLOT {
            "All right! Your first character was added.".to_string()
        } else {
            format!("All right! Your character {slot} was added.")
        };

        let reply = OutgoingMessage::reply_to(msg, body)
            .with_keyboard(added_keyboard(ctx, msg, &msg.sender, slot));
        return Ok(CommandOutcome::message(reply));
    }

    Err(CommandError::Malformed)
}

fn aliased_outcome(ctx: &CommandContext<'_>, msg: &IncomingMessage, slot: i64) -> CommandOutcome {
    let move_text = ctx
        .registry
        .text_for(CommandKey::Move, ctx.locale())
        .unwrap_or_default();

    let body = format!(
        "All right! Your character was added.\n\
         It is temporarily assigned to the alias user @{alias}.\n\n\
         To claim it, reply with your real user id now:",
        alias = msg.sender
    );
    let body2 = format!("@{} @your_user_id", ctx.config.bot_username);

    let template = format!("{move_text} @{} @{{}} {slot}", msg.sender);

    let first = OutgoingMessage::reply_to(msg, body)
        .with_keyboard(added_keyboard(ctx, msg, &msg.sender, slot));
    let second = OutgoingMessage::reply_to(msg, body2);

    CommandOutcome::messages(vec![first, second]).with_state(ConversationState::DynamicReplay(
        ReplayTemplates {
            assign_owner_template: Some(template),
            ..Default::default()
        },
    ))
}

fn added_keyboard(
    ctx: &CommandContext<'_>,
    msg: &IncomingMessage,
    owner: &str,
    slot: i64,
) -> Vec<String> {
    let locale = ctx.locale();
    vec![
        command_for_target(
            ctx.registry,
            locale,
            CommandKey::Show,
            &msg.sender,
            owner,
            Some(slot),
            false,
        ),
        command_for_target(
            ctx.registry,
            locale,
            CommandKey::SetPicture,
            &msg.sender,
            owner,
            Some(slot),
            false,
        ),
        command_for_target(
            ctx.registry,
            locale,
            CommandKey::Delete,
            &msg.sender,
            owner,
            Some(slot),
            true,
        ),
        ctx.list_label(),
    ]
}
