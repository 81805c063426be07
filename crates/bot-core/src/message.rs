//! Inbound and outbound message types.

use serde::{Deserialize, Serialize};

/// A message received from the chat transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingMessage {
    /// Identifier of the sending user.
    pub sender: String,
    /// Chat the message arrived in (direct chat or group channel id).
    pub chat_id: String,
    /// Raw message body. Empty for non-text events.
    pub text: String,
    /// Display name of the sender, if the transport provides one.
    pub sender_name: Option<String>,
    /// Transport timestamp (unix seconds).
    pub timestamp: i64,
}

impl IncomingMessage {
    /// Create a direct message (chat id equals the sender id).
    pub fn direct(sender: impl Into<String>, text: impl Into<String>, timestamp: i64) -> Self {
        let sender = sender.into();
        Self {
            chat_id: sender.clone(),
            sender,
            text: text.into(),
            sender_name: None,
            timestamp,
        }
    }

    /// Create a message sent in a group chat.
    pub fn in_group(
        sender: impl Into<String>,
        chat_id: impl Into<String>,
        text: impl Into<String>,
        timestamp: i64,
    ) -> Self {
        Self {
            sender: sender.into(),
            chat_id: chat_id.into(),
            text: text.into(),
            sender_name: None,
            timestamp,
        }
    }

    /// Attach a display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.sender_name = Some(name.into());
        self
    }

    /// The name to address the sender by: display name if known,
    /// otherwise the raw identifier.
    pub fn display_name(&self) -> &str {
        self.sender_name.as_deref().unwrap_or(&self.sender)
    }
}

/// A message to be delivered back through the chat transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    /// Recipient user identifier.
    pub recipient: String,
    /// Chat to deliver into.
    pub chat_id: String,
    /// Message body.
    pub body: String,
    /// Suggested replies offered to the user, in order.
    pub keyboard: Vec<String>,
    /// Optional picture to attach instead of / alongside the body.
    pub picture_url: Option<String>,
}

impl OutgoingMessage {
    /// Create a text reply addressed to the sender of `incoming`.
    pub fn reply_to(incoming: &IncomingMessage, body: impl Into<String>) -> Self {
        Self {
            recipient: incoming.sender.clone(),
            chat_id: incoming.chat_id.clone(),
            body: body.into(),
            keyboard: Vec::new(),
            picture_url: None,
        }
    }

    /// Create a picture reply addressed to the sender of `incoming`.
    pub fn picture_reply_to(incoming: &IncomingMessage, url: impl Into<String>) -> Self {
        Self {
            recipient: incoming.sender.clone(),
            chat_id: incoming.chat_id.clone(),
            body: String::new(),
            keyboard: Vec::new(),
            picture_url: Some(url.into()),
        }
    }

    /// Attach a suggested-reply keyboard.
    pub fn with_keyboard(mut self, keyboard: Vec<String>) -> Self {
        self.keyboard = keyboard;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_message_uses_sender_as_chat() {
        let msg = IncomingMessage::direct("alice", "show", 100);
        assert_eq!(msg.chat_id, "alice");
        assert_eq!(msg.display_name(), "alice");
    }

    #[test]
    fn display_name_prefers_transport_name() {
        let msg = IncomingMessage::direct("alice", "show", 100).with_name("Alice");
        assert_eq!(msg.display_name(), "Alice");
    }

    #[test]
    fn reply_targets_sender_chat() {
        let msg = IncomingMessage::in_group("alice", "group-1", "list", 100);
        let reply = OutgoingMessage::reply_to(&msg, "hi").with_keyboard(vec!["help".into()]);
        assert_eq!(reply.recipient, "alice");
        assert_eq!(reply.chat_id, "group-1");
        assert_eq!(reply.keyboard, vec!["help".to_string()]);
        assert!(reply.picture_url.is_none());
    }
}
