//! Reply rendering helpers shared by handlers.

use bot_core::{glyphs, split_body, IncomingMessage, OutgoingMessage};
use chrono::DateTime;
use database::{picture, CharacterView, ConversationState, ReplayTemplates};

use crate::context::CommandContext;
use crate::error::Result;
use crate::key::CommandKey;
use crate::registry::CommandRegistry;

/// Build the command text addressing a specific (owner, slot) target.
///
/// The owner is spelled out only when it differs from the actor (or is
/// forced), and the slot only when it is not the default slot 1, so
/// suggested replies stay as short as users would type them.
pub fn command_for_target(
    registry: &CommandRegistry,
    locale: &str,
    key: CommandKey,
    actor: &str,
    owner: &str,
    slot: Option<i64>,
    force_owner: bool,
) -> String {
    let text = registry.text_for(key, locale).unwrap_or_default();
    let show_owner = owner != actor || force_owner;
    let show_slot = slot.is_some_and(|s| s > database::character::MIN_SLOT);

    match (show_owner, show_slot) {
        (true, true) => format!("{text} @{owner} {}", slot.unwrap_or_default()),
        (true, false) => format!("{text} @{owner}"),
        (false, true) => format!("{text} {}", slot.unwrap_or_default()),
        (false, false) => text.to_string(),
    }
}

/// Render one character sheet: body with provenance footer, picture if
/// confirmed, navigation glyphs, and the replay payload arming them.
pub async fn render_character(
    ctx: &CommandContext<'_>,
    msg: &IncomingMessage,
    view: &CharacterView,
) -> Result<(Vec<OutgoingMessage>, ConversationState)> {
    let locale = ctx.locale();
    let mut messages = Vec::new();
    let mut keyboard = Vec::new();
    let mut templates = ReplayTemplates::default();
    let mut appendix = String::new();

    if let Some(prev) = view.prev_slot {
        templates.left = Some(command_for_target(
            ctx.registry,
            locale,
            CommandKey::Show,
            &msg.sender,
            &view.owner,
            Some(prev),
            false,
        ));
        keyboard.push(glyphs::LEFT.to_string());
    }

    if let Some(next) = view.next_slot {
        templates.right = Some(command_for_target(
            ctx.registry,
            locale,
            CommandKey::Show,
            &msg.sender,
            &view.owner,
            Some(next),
            false,
        ));
        keyboard.push(glyphs::RIGHT.to_string());
    }

    if !templates.is_empty() {
        appendix.push_str(&format!(
            "\n\n(This user has more characters: {} and {} to navigate)",
            glyphs::LEFT,
            glyphs::RIGHT
        ));
    }

    if view.owner == msg.sender {
        keyboard.push(command_for_target(
            ctx.registry,
            locale,
            CommandKey::SetPicture,
            &msg.sender,
            &view.owner,
            Some(view.slot),
            false,
        ));
    }
    keyboard.push(ctx.list_label());

    match picture::latest_picture(ctx.db.pool(), &view.owner, view.slot).await? {
        Some(pic) if pic.active => {
            messages.push(OutgoingMessage::picture_reply_to(msg, pic.file_name));
        }
        Some(_) => {
            appendix.push_str("\n\nCharacter pictures must be confirmed before they are shown.");
        }
        None => {}
    }

    let body = format!(
        "{}\n\n---\nCharacter of @{}\nCreated by @{}\nCreated at {}{}",
        view.text,
        view.owner,
        view.creator,
        format_timestamp(view.created_at),
        appendix,
    );

    for chunk in split_body(&body) {
        messages.push(OutgoingMessage::reply_to(msg, chunk).with_keyboard(keyboard.clone()));
    }

    Ok((messages, ConversationState::replay(templates)))
}

/// Localize the leading command token of a keyboard label, leaving any
/// arguments untouched: `"anzeigen @bob 2"` becomes `"show @bob 2"`
/// under the "en" locale.
pub fn localize_first_token(registry: &CommandRegistry, locale: &str, label: &str) -> String {
    let label = label.trim();
    match label.split_once(char::is_whitespace) {
        Some((token, rest)) => {
            format!("{} {}", registry.localize_token(token, locale), rest.trim_start())
        }
        None => registry.localize_token(label, locale),
    }
}

/// Format a unix timestamp for display.
pub fn format_timestamp(unix_seconds: i64) -> String {
    DateTime::from_timestamp(unix_seconds, 0)
        .map(|dt| dt.format("%d.%m.%Y %H:%M").to_string())
        .unwrap_or_else(|| unix_seconds.to_string())
}

/// Format a unix timestamp as a date only.
pub fn format_date(unix_seconds: i64) -> String {
    DateTime::from_timestamp(unix_seconds, 0)
        .map(|dt| dt.format("%d.%m.%Y").to_string())
        .unwrap_or_else(|| unix_seconds.to_string())
}
