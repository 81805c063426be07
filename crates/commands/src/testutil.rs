//! Shared helpers for handler tests.

use bot_core::IncomingMessage;
use database::Database;

pub(crate) async fn db() -> Database {
    let db = Database::connect_with_pool_size("sqlite::memory:", 1)
        .await
        .unwrap();
    db.migrate().await.unwrap();
    db
}

pub(crate) fn msg(sender: &str, text: &str) -> IncomingMessage {
    IncomingMessage::direct(sender, text, 100)
}

/// Build a context over borrowed parts.
macro_rules! test_ctx {
    ($ctx:ident, $db:expr) => {
        let config = bot_core::BotConfig::default();
        let registry = crate::registry::CommandRegistry::standard().unwrap();
        let mut rng = crate::rng::ScriptedRandom::default();
        let mut $ctx = crate::context::CommandContext {
            db: $db,
            config: &config,
            registry: &registry,
            rng: &mut rng,
        };
    };
    ($ctx:ident, $db:expr, admins = $admins:expr) => {
        let config = bot_core::BotConfig {
            admins: $admins.iter().map(|s: &&str| s.to_string()).collect(),
            ..Default::default()
        };
        let registry = crate::registry::CommandRegistry::standard().unwrap();
        let mut rng = crate::rng::ScriptedRandom::default();
        let mut $ctx = crate::context::CommandContext {
            db: $db,
            config: &config,
            registry: &registry,
            rng: &mut rng,
        };
    };
    ($ctx:ident, $db:expr, rng = $values:expr) => {
        let config = bot_core::BotConfig::default();
        let registry = crate::registry::CommandRegistry::standard().unwrap();
        let mut rng = crate::rng::ScriptedRandom::new($values);
        let mut $ctx = crate::context::CommandContext {
            db: $db,
            config: &config,
            registry: &registry,
            rng: &mut rng,
        };
    };
}

pub(crate) use test_ctx;
