//! Glyph-shortcut rewriting.
//!
//! When a user's conversation state carries replay templates, the four
//! reserved inputs (left arrow, right arrow, redo, bare `@name`) are
//! substituted with the armed command before tokenization. In any
//! other state the glyphs pass through as literal text.

use bot_core::glyphs;
use database::ConversationState;

/// Rewrite a glyph reply using the armed templates.
///
/// Returns `None` when the input is not a glyph, no matching template
/// is armed, or the state is not `DynamicReplay`; the caller then
/// dispatches the original text unchanged.
pub fn rewrite(state: &ConversationState, text: &str) -> Option<String> {
    let ConversationState::DynamicReplay(templates) = state else {
        return None;
    };

    let trimmed = text.trim();
    match trimmed {
        glyphs::LEFT => templates.left.clone(),
        glyphs::RIGHT => templates.right.clone(),
        glyphs::REDO => templates.redo.clone(),
        _ => {
            let name = trimmed.strip_prefix('@')?.trim();
            if name.is_empty() {
                return None;
            }
            templates
                .assign_owner_template
                .as_ref()
                .map(|template| template.replace("{}", name))
        }
    }
}
