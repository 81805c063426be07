//! The message dispatcher.
//!
//! One inbound message runs to completion before the next message of
//! the same user is considered: glyph rewrite against the stored
//! conversation state, tokenization, registry lookup, handler
//! invocation, and exactly one state write. Handler-level failures
//! (malformed arguments, missing records, refusals) become reply
//! messages; only infrastructure failures abort the dispatch, and then
//! no state is written at all.

use bot_core::{BotConfig, IncomingMessage, OutgoingMessage};
use commands::handlers;
use commands::{
    CommandContext, CommandError, CommandKey, CommandRegistry, RandomSource, ThreadRandom,
};
use database::{character, conversation, picture, ConversationState, Database};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::glyphs;
use crate::locks::UserLocks;
use crate::pictures::{HttpPictureFetcher, PictureFetcher};

/// Dispatches inbound messages to command handlers.
pub struct Dispatcher {
    db: Database,
    config: BotConfig,
    registry: CommandRegistry,
    rng: Mutex<Box<dyn RandomSource>>,
    fetcher: Arc<dyn PictureFetcher>,
    locks: UserLocks,
}

impl Dispatcher {
    /// Create a dispatcher with the standard command table, the
    /// thread-local randomness source, and the HTTP picture fetcher.
    pub fn new(db: Database, config: BotConfig) -> Result<Self> {
        Ok(Self {
            db,
            config,
            registry: CommandRegistry::standard()?,
            rng: Mutex::new(Box::new(ThreadRandom)),
            fetcher: Arc::new(HttpPictureFetcher::new()),
            locks: UserLocks::new(),
        })
    }

    /// Substitute the randomness source (scripted sources make dice
    /// dispatches deterministic).
    pub fn with_rng(mut self, rng: Box<dyn RandomSource>) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    /// Substitute the picture fetcher.
    pub fn with_fetcher(mut self, fetcher: Arc<dyn PictureFetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// The command registry in use.
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Handle one inbound text message and return the replies.
    pub async fn handle_text(&self, msg: &IncomingMessage) -> Result<Vec<OutgoingMessage>> {
        let _guard = self.locks.acquire(&msg.sender).await;

        // An empty message is a greeting, not a command; it does not
        // touch the stored state.
        if msg.text.trim().is_empty() {
            return Ok(vec![self.greeting(msg)]);
        }

        let state = conversation::get_state(self.db.pool(), &msg.sender).await?;

        let text = match glyphs::rewrite(&state, &msg.text) {
            Some(substituted) => {
                debug!(sender = %msg.sender, %substituted, "glyph rewritten");
                substituted
            }
            None => msg.text.clone(),
        };

        let trimmed = text.trim();
        let (token_raw, raw_remainder) = match trimmed.find(char::is_whitespace) {
            Some(idx) => {
                let (head, tail) = trimmed.split_at(idx);
                (head, tail.trim_start())
            }
            None => (trimmed, ""),
        };
        let token = token_raw.to_lowercase();

        if token.is_empty() {
            let reply = self.not_understood(msg);
            conversation::set_state(self.db.pool(), &msg.sender, &ConversationState::None).await?;
            return Ok(vec![reply]);
        }

        let Some(key) = self.registry.resolve(&token) else {
            // No fallback registered: report instead of failing hard.
            let reply = self.not_understood(msg);
            conversation::set_state(self.db.pool(), &msg.sender, &ConversationState::None).await?;
            return Ok(vec![reply]);
        };

        info!(sender = %msg.sender, %token, ?key, "dispatching command");

        let result = {
            let mut rng = self.rng.lock().await;
            let mut ctx = CommandContext {
                db: &self.db,
                config: &self.config,
                registry: &self.registry,
                rng: rng.as_mut(),
            };
            handlers::dispatch(key, &token, &mut ctx, msg, raw_remainder).await
        };

        match result {
            Ok(outcome) => {
                conversation::set_state(self.db.pool(), &msg.sender, &outcome.state).await?;
                Ok(outcome.messages)
            }
            Err(CommandError::Malformed) => {
                let body = format!(
                    "Error calling the command. See '{}'.",
                    self.help_label()
                );
                self.finish_with(msg, body, vec![self.help_label()]).await
            }
            Err(CommandError::NotFound) => {
                let body = "No matching character sheet was found.".to_string();
                self.finish_with(msg, body, vec![self.list_label()]).await
            }
            Err(CommandError::Unauthorized) => {
                let body = "You are not allowed to do that.".to_string();
                self.finish_with(msg, body, vec![self.help_label()]).await
            }
            Err(CommandError::Database(err)) => {
                warn!(sender = %msg.sender, error = %err, "dispatch aborted");
                Err(err.into())
            }
        }
    }

    /// Handle an inbound picture. Only meaningful while the sender's
    /// state is `AwaitingPicture`; a failed download re-arms the same
    /// payload so the user can retry without retyping the target.
    pub async fn handle_picture(
        &self,
        msg: &IncomingMessage,
        picture_url: &str,
    ) -> Result<Vec<OutgoingMessage>> {
        let _guard = self.locks.acquire(&msg.sender).await;

        let state = conversation::get_state(self.db.pool(), &msg.sender).await?;
        let ConversationState::AwaitingPicture { owner, slot } = state else {
            let body = format!(
                "Sorry {}, I can't do anything with this picture.",
                msg.display_name()
            );
            let reply =
                OutgoingMessage::reply_to(msg, body).with_keyboard(vec![self.help_label()]);
            conversation::set_state(self.db.pool(), &msg.sender, &ConversationState::None).await?;
            return Ok(vec![reply]);
        };

        // The default slot is resolved at store time, when the sheet
        // layout may have changed since the command was issued.
        let target_slot = match slot {
            Some(slot) => slot,
            None => character::first_slot(self.db.pool(), &owner)
                .await?
                .unwrap_or(character::MIN_SLOT),
        };

        let stem = self.config.picture_dir.join(format!(
            "{owner}-{}-{target_slot}-{}",
            msg.sender,
            unix_now()
        ));

        let (reply, next_state) = match self.fetcher.fetch(picture_url, &stem).await {
            Ok(path) => {
                let file_name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                picture::set_picture(self.db.pool(), &owner, target_slot, &file_name, &msg.sender)
                    .await?;

                let body = format!(
                    "All right! The picture was stored. Please contact @{} to get it \
                     confirmed; it stays hidden until then.",
                    self.config.first_admin().unwrap_or("admin"),
                );
                let keyboard = vec![
                    commands::render::command_for_target(
                        &self.registry,
                        &self.config.locale,
                        CommandKey::Show,
                        &msg.sender,
                        &owner,
                        Some(target_slot),
                        false,
                    ),
                    self.list_label(),
                ];
                (
                    OutgoingMessage::reply_to(msg, body).with_keyboard(keyboard),
                    ConversationState::None,
                )
            }
            Err(err) => {
                warn!(sender = %msg.sender, error = %err, "picture fetch failed");
                let body = "Something went wrong while storing the picture. Please try again."
                    .to_string();
                let keyboard = vec![commands::render::command_for_target(
                    &self.registry,
                    &self.config.locale,
                    CommandKey::SetPicture,
                    &msg.sender,
                    &owner,
                    slot,
                    false,
                )];
                // Re-arm with the original payload for a retry.
                (
                    OutgoingMessage::reply_to(msg, body).with_keyboard(keyboard),
                    ConversationState::AwaitingPicture { owner, slot },
                )
            }
        };

        conversation::set_state(self.db.pool(), &msg.sender, &next_state).await?;
        Ok(vec![reply])
    }

    async fn finish_with(
        &self,
        msg: &IncomingMessage,
        body: String,
        keyboard: Vec<String>,
    ) -> Result<Vec<OutgoingMessage>> {
        conversation::set_state(self.db.pool(), &msg.sender, &ConversationState::None).await?;
        Ok(vec![OutgoingMessage::reply_to(msg, body).with_keyboard(keyboard)])
    }

    fn greeting(&self, msg: &IncomingMessage) -> OutgoingMessage {
        let body = format!(
            "Hi {}, I am the character sheet bot of group #{}.\n\
             For more information tap reply and choose '{}'.",
            msg.display_name(),
            self.config.group_tag,
            self.help_label(),
        );
        OutgoingMessage::reply_to(msg, body).with_keyboard(vec![
            self.help_label(),
            self.registry.localize_token("rules", &self.config.locale),
            self.registry.localize_token("template", &self.config.locale),
        ])
    }

    fn not_understood(&self, msg: &IncomingMessage) -> OutgoingMessage {
        let body = format!("Sorry {}, I did not understand you.", msg.display_name());
        OutgoingMessage::reply_to(msg, body).with_keyboard(vec![self.help_label()])
    }

    fn help_label(&self) -> String {
        self.registry.localize_token("help", &self.config.locale)
    }

    fn list_label(&self) -> String {
        self.registry.localize_token("list", &self.config.locale)
    }
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pictures::FetchError;
    use async_trait::async_trait;
    use bot_core::glyphs as glyph_chars;
    use commands::ScriptedRandom;
    use database::ReplayTemplates;
    use std::path::{Path, PathBuf};

    struct StubFetcher {
        fail: bool,
    }

    #[async_trait]
    impl PictureFetcher for StubFetcher {
        async fn fetch(&self, _url: &str, dest_stem: &Path) -> std::result::Result<PathBuf, FetchError> {
            if self.fail {
                Err(FetchError::Status(500))
            } else {
                Ok(dest_stem.with_extension("jpg"))
            }
        }
    }

    async fn test_dispatcher() -> Dispatcher {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        Dispatcher::new(db, BotConfig::default()).unwrap()
    }

    fn msg(sender: &str, text: &str) -> IncomingMessage {
        IncomingMessage::direct(sender, text, 100)
    }

    #[tokio::test]
    async fn empty_text_greets_without_touching_state() {
        let dispatcher = test_dispatcher().await;
        let armed = ConversationState::DynamicReplay(ReplayTemplates {
            redo: Some("dice".to_string()),
            ..Default::default()
        });
        conversation::set_state(dispatcher.db.pool(), "alice", &armed)
            .await
            .unwrap();

        let replies = dispatcher.handle_text(&msg("alice", "")).await.unwrap();
        assert!(replies[0].body.starts_with("Hi alice"));

        // The armed payload survived the greeting.
        let state = conversation::get_state(dispatcher.db.pool(), "alice")
            .await
            .unwrap();
        assert_eq!(state, armed);
    }

    #[tokio::test]
    async fn glyph_replays_the_armed_show_command() {
        let dispatcher = test_dispatcher().await;
        for text in ["one", "two", "three"] {
            character::add_character(dispatcher.db.pool(), "bob", "bob", text)
                .await
                .unwrap();
        }

        let replies = dispatcher
            .handle_text(&msg("alice", "show @bob 2"))
            .await
            .unwrap();
        assert!(replies[0].body.contains("two"));

        // The right arrow now dispatches exactly like "show @bob 3".
        let replies = dispatcher
            .handle_text(&msg("alice", glyph_chars::RIGHT))
            .await
            .unwrap();
        assert!(replies[0].body.contains("three"));
        assert!(replies[0].body.contains("Character of @bob"));
    }

    #[tokio::test]
    async fn glyph_without_replay_state_is_literal() {
        let dispatcher = test_dispatcher().await;
        let replies = dispatcher
            .handle_text(&msg("alice", glyph_chars::RIGHT))
            .await
            .unwrap();
        assert!(replies[0].body.contains("I don't know the command"));
    }

    #[tokio::test]
    async fn every_dispatch_overwrites_the_state() {
        let dispatcher = test_dispatcher().await;
        for text in ["one", "two"] {
            character::add_character(dispatcher.db.pool(), "alice", "alice", text)
                .await
                .unwrap();
        }

        // show arms navigation...
        dispatcher.handle_text(&msg("alice", "show 1")).await.unwrap();
        let state = conversation::get_state(dispatcher.db.pool(), "alice")
            .await
            .unwrap();
        assert!(matches!(state, ConversationState::DynamicReplay(_)));

        // ...and an unrelated command clears it back to None.
        dispatcher.handle_text(&msg("alice", "help")).await.unwrap();
        let state = conversation::get_state(dispatcher.db.pool(), "alice")
            .await
            .unwrap();
        assert_eq!(state, ConversationState::None);
    }

    #[tokio::test]
    async fn redo_glyph_repeats_a_roll() {
        let dispatcher = test_dispatcher()
            .await
            .with_rng(Box::new(ScriptedRandom::new([4, 2])));

        let replies = dispatcher.handle_text(&msg("alice", "dice")).await.unwrap();
        assert_eq!(replies[0].body, "The die shows: 4");

        let replies = dispatcher
            .handle_text(&msg("alice", glyph_chars::REDO))
            .await
            .unwrap();
        assert_eq!(replies[0].body, "The die shows: 2");
    }

    #[tokio::test]
    async fn malformed_arguments_point_to_help() {
        let dispatcher = test_dispatcher().await;
        let replies = dispatcher.handle_text(&msg("alice", "add")).await.unwrap();
        assert!(replies[0].body.contains("Error calling the command"));
        assert_eq!(replies[0].keyboard, vec!["help".to_string()]);
    }

    #[tokio::test]
    async fn missing_record_is_informational() {
        let dispatcher = test_dispatcher().await;
        let replies = dispatcher
            .handle_text(&msg("alice", "change 5 new text"))
            .await
            .unwrap();
        assert!(replies[0].body.contains("No matching character sheet"));
    }

    #[tokio::test]
    async fn admin_commands_refuse_plain_users() {
        let dispatcher = test_dispatcher().await;
        let replies = dispatcher
            .handle_text(&msg("alice", "set-command motd hi"))
            .await
            .unwrap();
        assert!(replies[0].body.contains("not allowed"));
    }

    #[tokio::test]
    async fn picture_flow_stores_and_clears_state() {
        let dispatcher = test_dispatcher()
            .await
            .with_fetcher(Arc::new(StubFetcher { fail: false }));
        character::add_character(dispatcher.db.pool(), "alice", "alice", "sheet")
            .await
            .unwrap();

        dispatcher
            .handle_text(&msg("alice", "set-picture"))
            .await
            .unwrap();

        let replies = dispatcher
            .handle_picture(&msg("alice", ""), "http://example.com/pic")
            .await
            .unwrap();
        assert!(replies[0].body.contains("picture was stored"));

        let stored = picture::latest_picture(dispatcher.db.pool(), "alice", 1)
            .await
            .unwrap()
            .unwrap();
        assert!(!stored.active);

        let state = conversation::get_state(dispatcher.db.pool(), "alice")
            .await
            .unwrap();
        assert_eq!(state, ConversationState::None);
    }

    #[tokio::test]
    async fn failed_picture_fetch_rearms_the_payload() {
        let dispatcher = test_dispatcher()
            .await
            .with_fetcher(Arc::new(StubFetcher { fail: true }));

        dispatcher
            .handle_text(&msg("alice", "set-picture 2"))
            .await
            .unwrap();

        let replies = dispatcher
            .handle_picture(&msg("alice", ""), "http://example.com/pic")
            .await
            .unwrap();
        assert!(replies[0].body.contains("try again"));

        let state = conversation::get_state(dispatcher.db.pool(), "alice")
            .await
            .unwrap();
        assert_eq!(
            state,
            ConversationState::AwaitingPicture {
                owner: "alice".to_string(),
                slot: Some(2),
            }
        );
    }

    #[tokio::test]
    async fn unexpected_picture_is_reported() {
        let dispatcher = test_dispatcher().await;
        let replies = dispatcher
            .handle_picture(&msg("alice", ""), "http://example.com/pic")
            .await
            .unwrap();
        assert!(replies[0].body.contains("can't do anything with this picture"));
    }
}
