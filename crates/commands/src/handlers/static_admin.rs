//! Admin configuration of canned replies.

use bot_core::{IncomingMessage, OutgoingMessage};
use database::static_message;

use crate::args::split_args;
use crate::context::{CommandContext, CommandOutcome};
use crate::error::{CommandError, Result};

pub async fn execute_set_command(
    ctx: &mut CommandContext<'_>,
    msg: &IncomingMessage,
    raw_remainder: &str,
) -> Result<CommandOutcome> {
    require_admin(ctx, msg)?;

    let (token, value) = parse_pair(raw_remainder)?;

    // Reuse the canonical trigger if the token matched an alternate.
    let canonical = match static_message::get_static_message(ctx.db.pool(), &token).await? {
        Some(existing) => existing.command,
        None => token,
    };

    let updated = static_message::set_static_message(ctx.db.pool(), &canonical, &value).await?;

    let keyboards_example = updated
        .keyboards()
        .map(|k| k.join(", "))
        .unwrap_or_else(|| "help, list".to_string());
    let alts_example = updated
        .alternate_commands()
        .map(|a| a.join(", "))
        .unwrap_or_else(|| "alt1, alt2".to_string());

    let body = format!(
        "You successfully updated the canned reply for '{command}'.\n\
         You can set its suggested replies (comma separated) with:\n\n\
         @{bot} {kb_cmd} {command} {keyboards_example}\n\n\n\
         You can add alternate triggers (like 'h' for help) with:\n\n\
         @{bot} {alt_cmd} {command} {alts_example}",
        command = updated.command,
        bot = ctx.config.bot_username,
        kb_cmd = keyboards_command(ctx),
        alt_cmd = alt_commands_command(ctx),
    );

    Ok(CommandOutcome::message(
        OutgoingMessage::reply_to(msg, body)
            .with_keyboard(vec![updated.command.clone(), admin_help_label(ctx)]),
    ))
}

pub async fn execute_set_keyboards(
    ctx: &mut CommandContext<'_>,
    msg: &IncomingMessage,
    raw_remainder: &str,
) -> Result<CommandOutcome> {
    require_admin(ctx, msg)?;

    let (token, value) = parse_pair(raw_remainder)?;

    let Some(existing) = static_message::get_static_message(ctx.db.pool(), &token).await? else {
        return Ok(unknown_command(ctx, msg, &token));
    };

    let keyboards = split_list(&value);
    let updated =
        static_message::set_static_message_keyboards(ctx.db.pool(), &existing.command, &keyboards)
            .await?;

    let alts_example = updated
        .alternate_commands()
        .map(|a| a.join(", "))
        .unwrap_or_else(|| "alt1, alt2".to_string());

    let body = format!(
        "You successfully updated the suggested replies for '{command}'.\n\
         You can add alternate triggers with:\n\n\
         @{bot} {alt_cmd} {command} {alts_example}",
        command = updated.command,
        bot = ctx.config.bot_username,
        alt_cmd = alt_commands_command(ctx),
    );

    Ok(CommandOutcome::message(
        OutgoingMessage::reply_to(msg, body)
            .with_keyboard(vec![updated.command.clone(), admin_help_label(ctx)]),
    ))
}

pub async fn execute_set_alt_commands(
    ctx: &mut CommandContext<'_>,
    msg: &IncomingMessage,
    raw_remainder: &str,
) -> Result<CommandOutcome> {
    require_admin(ctx, msg)?;

    let (token, value) = parse_pair(raw_remainder)?;

    let Some(existing) = static_message::get_static_message(ctx.db.pool(), &token).await? else {
        return Ok(unknown_command(ctx, msg, &token));
    };

    let alts = split_list(&value);
    let updated = static_message::set_static_message_alt_commands(
        ctx.db.pool(),
        &existing.command,
        &alts,
    )
    .await?;

    let keyboards_example = updated
        .keyboards()
        .map(|k| k.join(", "))
        .unwrap_or_else(|| "help, list".to_string());

    let body = format!(
        "You successfully updated the alternate triggers for '{command}'.\n\
         You can set its suggested replies with:\n\n\
         @{bot} {kb_cmd} {command} {keyboards_example}",
        command = updated.command,
        bot = ctx.config.bot_username,
        kb_cmd = keyboards_command(ctx),
    );

    Ok(CommandOutcome::message(
        OutgoingMessage::reply_to(msg, body)
            .with_keyboard(vec![updated.command.clone(), admin_help_label(ctx)]),
    ))
}

fn require_admin(ctx: &CommandContext<'_>, msg: &IncomingMessage) -> Result<()> {
    if ctx.config.is_admin(&msg.sender) {
        Ok(())
    } else {
        Err(CommandError::Unauthorized)
    }
}

/// Split `remainder` into (command token, value text).
fn parse_pair(raw_remainder: &str) -> Result<(String, String)> {
    let parts = split_args(raw_remainder, 2);
    if parts.len() != 2 || parts[1].trim().is_empty() {
        return Err(CommandError::Malformed);
    }
    Ok((parts[0].to_lowercase(), parts[1].trim().to_string()))
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn unknown_command(
    ctx: &CommandContext<'_>,
    msg: &IncomingMessage,
    token: &str,
) -> CommandOutcome {
    let body = format!("The command '{token}' does not exist.");
    CommandOutcome::message(
        OutgoingMessage::reply_to(msg, body).with_keyboard(vec![admin_help_label(ctx)]),
    )
}

fn admin_help_label(ctx: &CommandContext<'_>) -> String {
    ctx.registry.localize_token("admin-help", ctx.locale())
}

fn keyboards_command(ctx: &CommandContext<'_>) -> String {
    ctx.registry
        .localize_token("set-command-keyboards", ctx.locale())
}

fn alt_commands_command(ctx: &CommandContext<'_>) -> String {
    ctx.registry
        .localize_token("set-command-alternative-commands", ctx.locale())
}
