//! Handler context and outcome types.

use bot_core::{BotConfig, IncomingMessage, OutgoingMessage};
use database::{ConversationState, Database};

use crate::error::Result;
use crate::registry::CommandRegistry;
use crate::rng::RandomSource;

/// Everything a handler needs, injected by the dispatcher.
pub struct CommandContext<'a> {
    pub db: &'a Database,
    pub config: &'a BotConfig,
    pub registry: &'a CommandRegistry,
    pub rng: &'a mut dyn RandomSource,
}

impl CommandContext<'_> {
    /// Keyboard locale configured for this bot.
    pub fn locale(&self) -> &str {
        &self.config.locale
    }

    /// Whether the actor may act on `owner`'s sheets: it is their own,
    /// or they are an admin, or they hold a grant. Read-like commands
    /// issued in the home group channel bypass the check entirely.
    pub async fn check_auth(
        &self,
        msg: &IncomingMessage,
        owner: Option<&str>,
        group_bypass: bool,
    ) -> Result<bool> {
        if let Some(owner) = owner {
            if owner == msg.sender {
                return Ok(true);
            }
        }

        if group_bypass && self.config.is_group_chat(&msg.chat_id) {
            return Ok(true);
        }

        if self.config.is_admin(&msg.sender) {
            return Ok(true);
        }

        Ok(database::auth::is_authorized(self.db.pool(), &msg.sender).await?)
    }

    /// The standard refusal reply for a failed authorization check.
    pub fn refusal(&self, msg: &IncomingMessage) -> OutgoingMessage {
        let body = format!(
            "You are not allowed to run this command!\n\
             Ask for authorization in group #{}.",
            self.config.group_tag
        );
        OutgoingMessage::reply_to(msg, body).with_keyboard(vec![self.help_label()])
    }

    /// Localized label of the help command for keyboards.
    pub fn help_label(&self) -> String {
        self.registry.localize_token("help", self.locale())
    }

    /// Localized label of the list command for keyboards.
    pub fn list_label(&self) -> String {
        self.registry.localize_token("list", self.locale())
    }
}

/// What a handler returns: outbound messages plus the conversation
/// state to persist for the actor.
#[derive(Debug, Default)]
pub struct CommandOutcome {
    pub messages: Vec<OutgoingMessage>,
    pub state: ConversationState,
}

impl CommandOutcome {
    /// An outcome with a single reply and no pending state.
    pub fn message(message: OutgoingMessage) -> Self {
        Self {
            messages: vec![message],
            state: ConversationState::None,
        }
    }

    /// An outcome carrying several replies.
    pub fn messages(messages: Vec<OutgoingMessage>) -> Self {
        Self {
            messages,
            state: ConversationState::None,
        }
    }

    /// Replace the state to persist.
    pub fn with_state(mut self, state: ConversationState) -> Self {
        self.state = state;
        self
    }
}
