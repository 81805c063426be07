//! Character template and usage examples.

use bot_core::{IncomingMessage, OutgoingMessage};
use database::static_message;

use crate::context::{CommandContext, CommandOutcome};
use crate::error::Result;
use crate::key::CommandKey;

pub async fn execute_template(
    ctx: &mut CommandContext<'_>,
    msg: &IncomingMessage,
) -> Result<CommandOutcome> {
    let locale = ctx.locale();
    let add_text = ctx.registry.text_for(CommandKey::Add, locale).unwrap_or_default();
    let change_text = ctx
        .registry
        .text_for(CommandKey::Change, locale)
        .unwrap_or_default();

    let intro = format!(
        "The following template can be used to create a new character for the RPG.\n\
         A filled-in sheet is required to take part; please post it in the group \
         channel #{group}.\n\
         Important: keep the field keywords (First name:, Last name:, ...) in place.\n\
         If you already have a character and want to update it, write '{change_text}' \
         instead of '{add_text}' in the first line.",
        group = ctx.config.group_tag,
    );

    let keyboard = vec![
        ctx.help_label(),
        ctx.registry.localize_token("more-examples", locale),
    ];

    let mut messages =
        vec![OutgoingMessage::reply_to(msg, intro).with_keyboard(keyboard.clone())];

    if let Some(template) =
        static_message::get_static_message(ctx.db.pool(), "template-only").await?
    {
        let body = format!(
            "@{bot} {add_text} \n{template}",
            bot = ctx.config.bot_username,
            template = template.response,
        );
        messages.push(OutgoingMessage::reply_to(msg, body).with_keyboard(keyboard));
    }

    Ok(CommandOutcome::messages(messages))
}

pub async fn execute_more_examples(
    ctx: &mut CommandContext<'_>,
    msg: &IncomingMessage,
) -> Result<CommandOutcome> {
    let locale = ctx.locale();
    let registry = ctx.registry;
    let bot = &ctx.config.bot_username;
    let admin = ctx.config.first_admin().unwrap_or("admin");

    let add_text = registry.text_for(CommandKey::Add, locale).unwrap_or_default();
    let change_text = registry.text_for(CommandKey::Change, locale).unwrap_or_default();
    let show_text = registry.text_for(CommandKey::Show, locale).unwrap_or_default();
    let delete_text = registry.text_for(CommandKey::Delete, locale).unwrap_or_default();
    let list_text = registry.text_for(CommandKey::List, locale).unwrap_or_default();
    let dice_text = registry.text_for(CommandKey::Dice, locale).unwrap_or_default();
    let help_text = ctx.help_label();

    let body = format!(
        "More examples\n\
         Each example is separated by -----\n\n\
         ------\n\
         @{bot} {add_text} @{user}\n\
         The sheet text goes here\n\
         Line breaks are allowed\n\
         ------\n\
         @{bot} {change_text}\n\
         The sheet text goes here\n\
         Without a user name the change applies to yourself\n\
         ------\n\
         @{bot} {show_text} @{admin}\n\
         ------\n\
         @{bot} {show_text}\n\
         ------\n\
         @{bot} {delete_text} @{user}\n\
         ------\n\
         @{bot} {list_text}\n\
         ------\n\
         @{bot} {help_text}\n\
         ------\n\
         @{bot} {dice_text} 8\n\
         ------\n\
         @{bot} {dice_text} Red, Green, Blue, Black, White\n\
         ------\n\
         Note that every command to the bot must start with @{bot}.",
        user = msg.sender,
    );

    let keyboard = vec![
        help_text.clone(),
        format!("{add_text} New character"),
        format!("{show_text} @{admin}"),
        show_text.to_string(),
        list_text.to_string(),
        format!("{dice_text} 8"),
        format!("{dice_text} Red, Green, Blue, Black, White"),
    ];

    Ok(CommandOutcome::message(
        OutgoingMessage::reply_to(msg, body).with_keyboard(keyboard),
    ))
}
