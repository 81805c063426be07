//! Reserved shorthand glyphs.
//!
//! These single symbols are offered on keyboards and expanded by the
//! dispatcher into full commands when a replay payload is armed.

/// Navigate to the previous page or character.
pub const LEFT: &str = "\u{2B05}\u{FE0F}";

/// Navigate to the next page or character.
pub const RIGHT: &str = "\u{27A1}\u{FE0F}";

/// Repeat the previous roll.
pub const REDO: &str = "\u{1F504}";
