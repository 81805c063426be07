//! Bot configuration.

use std::env;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("missing environment variable: {0}")]
    MissingVar(&'static str),
}

/// Runtime configuration for the bot.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// The bot's own username (commands in groups are addressed to it).
    pub bot_username: String,
    /// Human-readable tag of the home group, used in help texts.
    pub group_tag: String,
    /// Chat id of the home group channel. Read-like commands issued in
    /// this chat bypass the authorization check.
    pub group_chat_id: String,
    /// User identifiers with admin rights.
    pub admins: Vec<String>,
    /// Directory character pictures are stored in.
    pub picture_dir: PathBuf,
    /// Locale used for keyboards and canonical command texts.
    pub locale: String,
}

impl BotConfig {
    /// Read configuration from the environment.
    ///
    /// `BOT_USERNAME` is required; everything else has a default:
    /// `BOT_GROUP_TAG` ("somegroup"), `BOT_GROUP_CHAT_ID` (empty),
    /// `BOT_ADMINS` (comma separated, empty), `BOT_PICTURE_DIR`
    /// ("pictures") and `BOT_LOCALE` ("en").
    pub fn from_env() -> Result<Self, ConfigError> {
        let bot_username =
            env::var("BOT_USERNAME").map_err(|_| ConfigError::MissingVar("BOT_USERNAME"))?;

        let admins = env::var("BOT_ADMINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            bot_username,
            group_tag: env::var("BOT_GROUP_TAG").unwrap_or_else(|_| "somegroup".to_string()),
            group_chat_id: env::var("BOT_GROUP_CHAT_ID").unwrap_or_default(),
            admins,
            picture_dir: env::var("BOT_PICTURE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("pictures")),
            locale: env::var("BOT_LOCALE").unwrap_or_else(|_| "en".to_string()),
        })
    }

    /// Check whether `user_id` is on the admin list (case-insensitive).
    pub fn is_admin(&self, user_id: &str) -> bool {
        let user_id = user_id.trim().to_lowercase();
        self.admins.iter().any(|a| a.to_lowercase() == user_id)
    }

    /// The first configured admin, used as the moderation contact.
    pub fn first_admin(&self) -> Option<&str> {
        self.admins.first().map(|s| s.as_str())
    }

    /// Whether `chat_id` is the home group channel.
    pub fn is_group_chat(&self, chat_id: &str) -> bool {
        !self.group_chat_id.is_empty() && self.group_chat_id == chat_id
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            bot_username: "sheetbot".to_string(),
            group_tag: "somegroup".to_string(),
            group_chat_id: String::new(),
            admins: Vec::new(),
            picture_dir: PathBuf::from("pictures"),
            locale: "en".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_check_is_case_insensitive() {
        let config = BotConfig {
            admins: vec!["Alice".to_string(), "bob".to_string()],
            ..Default::default()
        };
        assert!(config.is_admin("alice"));
        assert!(config.is_admin("BOB"));
        assert!(!config.is_admin("carol"));
        assert_eq!(config.first_admin(), Some("Alice"));
    }

    #[test]
    fn empty_group_chat_never_matches() {
        let config = BotConfig::default();
        assert!(!config.is_group_chat(""));
        assert!(!config.is_group_chat("group-1"));
    }
}
