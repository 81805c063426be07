//! Locale-aware command registry.
//!
//! Maps free-text command tokens (per-locale canonical texts plus
//! case-insensitive alternates) to [`CommandKey`]s. Built once at
//! process start and immutable afterwards; resolution is first match
//! in registration order.

use thiserror::Error;
use tracing::debug;

use crate::key::CommandKey;

/// The locale used when a requested locale has no text.
pub const DEFAULT_LOCALE: &str = "en";

/// Errors raised while building a registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Two entries would share a trigger string.
    #[error("duplicate command string: {0}")]
    Duplicate(String),

    /// A fallback entry is already registered.
    #[error("fallback handler already registered")]
    FallbackAlreadySet,
}

/// One registered command: key, per-locale texts, alternates.
#[derive(Debug, Clone)]
struct CommandEntry {
    key: CommandKey,
    /// (locale tag, canonical text) pairs.
    locales: Vec<(&'static str, &'static str)>,
    alternates: Vec<&'static str>,
}

impl CommandEntry {
    fn matches(&self, token: &str) -> bool {
        self.locales
            .iter()
            .any(|(_, text)| text.eq_ignore_ascii_case(token) || text.to_lowercase() == token)
            || self
                .alternates
                .iter()
                .any(|alt| alt.eq_ignore_ascii_case(token) || alt.to_lowercase() == token)
    }
}

/// The command table.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
    fallback: Option<CommandKey>,
}

impl CommandRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one command entry.
    ///
    /// Fails if any locale text or alternate collides (case-insensitive)
    /// with an already registered trigger. The same key may appear in
    /// several entries (e.g. multiple canned-reply triggers).
    pub fn register(
        &mut self,
        key: CommandKey,
        locales: &[(&'static str, &'static str)],
        alternates: &[&'static str],
    ) -> Result<(), RegistryError> {
        for text in locales.iter().map(|(_, t)| *t).chain(alternates.iter().copied()) {
            if self.resolve_exact(text).is_some() {
                return Err(RegistryError::Duplicate(text.to_string()));
            }
        }

        debug!(?key, ?locales, "registering command");
        self.entries.push(CommandEntry {
            key,
            locales: locales.to_vec(),
            alternates: alternates.to_vec(),
        });
        Ok(())
    }

    /// Register the fallback key, matched when no entry matches.
    ///
    /// At most one fallback may exist; a second registration is an
    /// error rather than silently winning.
    pub fn register_fallback(&mut self, key: CommandKey) -> Result<(), RegistryError> {
        if self.fallback.is_some() {
            return Err(RegistryError::FallbackAlreadySet);
        }
        self.fallback = Some(key);
        Ok(())
    }

    /// Resolve a token to a key: first matching entry in registration
    /// order, then the fallback, then `None`.
    pub fn resolve(&self, token: &str) -> Option<CommandKey> {
        self.resolve_exact(token).or(self.fallback)
    }

    fn resolve_exact(&self, token: &str) -> Option<CommandKey> {
        let token = token.trim().to_lowercase();
        self.entries
            .iter()
            .find(|entry| entry.matches(&token))
            .map(|entry| entry.key)
    }

    /// Canonical text of `key` in `locale`, falling back to the
    /// default locale, then to any locale of the first entry carrying
    /// the key.
    pub fn text_for(&self, key: CommandKey, locale: &str) -> Option<&'static str> {
        let entry = self.entries.iter().find(|e| e.key == key)?;
        entry
            .locales
            .iter()
            .find(|(tag, _)| *tag == locale)
            .or_else(|| entry.locales.iter().find(|(tag, _)| *tag == DEFAULT_LOCALE))
            .or_else(|| entry.locales.first())
            .map(|(_, text)| *text)
    }

    /// Translate a token to its entry's canonical text in `locale`.
    ///
    /// Unregistered tokens pass through trimmed, so keyboard labels can
    /// mix command texts and plain strings.
    pub fn localize_token(&self, token: &str, locale: &str) -> String {
        let lowered = token.trim().to_lowercase();
        let entry = self.entries.iter().find(|entry| entry.matches(&lowered));
        match entry {
            Some(entry) => entry
                .locales
                .iter()
                .find(|(tag, _)| *tag == locale)
                .or_else(|| entry.locales.iter().find(|(tag, _)| *tag == DEFAULT_LOCALE))
                .or_else(|| entry.locales.first())
                .map(|(_, text)| text.to_string())
                .unwrap_or_else(|| token.trim().to_string()),
            None => token.trim().to_string(),
        }
    }

    /// Build the full command table.
    pub fn standard() -> Result<Self, RegistryError> {
        let mut registry = Self::new();

        registry.register(CommandKey::Add, &[("en", "add"), ("de", "Hinzufügen")], &[])?;
        registry.register(CommandKey::Change, &[("en", "change"), ("de", "Ändern")], &[])?;
        registry.register(
            CommandKey::SetPicture,
            &[("en", "set-picture"), ("de", "Bild-setzen")],
            &["set-pic", "Setze-Bild"],
        )?;
        registry.register(
            CommandKey::Show,
            &[("en", "show"), ("de", "Anzeigen")],
            &["Steckbrief", "Stecki"],
        )?;
        registry.register(CommandKey::Move, &[("en", "move"), ("de", "Verschieben")], &[])?;
        registry.register(
            CommandKey::Delete,
            &[("en", "delete"), ("de", "Löschen")],
            &["del"],
        )?;
        registry.register(
            CommandKey::DeleteLast,
            &[("en", "delete-last"), ("de", "Letzte-Löschen")],
            &["del-last"],
        )?;
        registry.register(CommandKey::Search, &[("en", "search"), ("de", "Suche")], &[])?;
        registry.register(CommandKey::List, &[("en", "list"), ("de", "Liste")], &[])?;
        registry.register(
            CommandKey::Dice,
            &[("en", "dice"), ("de", "Würfeln")],
            &["Würfel", "\u{1F3B2}"],
        )?;
        registry.register(CommandKey::Coin, &[("en", "coin"), ("de", "Münze")], &[])?;
        registry.register(
            CommandKey::Auth,
            &[("en", "auth"), ("de", "Berechtigen")],
            &["authorize", "authorise"],
        )?;
        registry.register(
            CommandKey::Unauth,
            &[("en", "unauth"), ("de", "Entmachten")],
            &["unauthorize", "unauthorise"],
        )?;
        registry.register(
            CommandKey::SetCommand,
            &[("en", "set-command"), ("de", "Setze-Befehl")],
            &["set-cmd"],
        )?;
        registry.register(
            CommandKey::SetCommandKeyboards,
            &[("en", "set-command-keyboards"), ("de", "Setze-Befehl-Tastaturen")],
            &["set-cmd-keyboards"],
        )?;
        registry.register(
            CommandKey::SetCommandAltCommands,
            &[
                ("en", "set-command-alternative-commands"),
                ("de", "Setze-Befehl-alternative-Befehle"),
            ],
            &["set-cmd-alt-cmd"],
        )?;
        registry.register(
            CommandKey::Template,
            &[("en", "template"), ("de", "Vorlage")],
            &["boilerplate", "draft", "Charaktervorlage"],
        )?;
        registry.register(
            CommandKey::MoreExamples,
            &[("en", "more-examples"), ("de", "Weitere-Beispiele")],
            &[],
        )?;

        // Canned replies: these resolve to the static handler, which
        // looks the token up in the static_messages table.
        registry.register(CommandKey::Static, &[("en", "help"), ("de", "Hilfe")], &["?", "h"])?;
        registry.register(CommandKey::Static, &[("en", "rules"), ("de", "Regeln")], &[])?;
        registry.register(
            CommandKey::Static,
            &[("en", "template-only"), ("de", "nur-Vorlage")],
            &[],
        )?;
        registry.register(
            CommandKey::Static,
            &[("en", "admin-help"), ("de", "Admin-Hilfe")],
            &[],
        )?;
        registry.register(
            CommandKey::Static,
            &[("en", "sourcecode"), ("de", "Quellcode")],
            &["source", "licence", "license"],
        )?;

        registry.register_fallback(CommandKey::Static)?;

        Ok(registry)
    }
}
