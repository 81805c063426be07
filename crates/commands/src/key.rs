//! The closed set of command keys.

/// Logical command identifiers.
///
/// Free-text tokens are resolved to one of these by the
/// [`CommandRegistry`](crate::CommandRegistry); dispatch then matches
/// exhaustively, so adding a command without wiring a handler fails at
/// build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKey {
    /// Create a sheet at the owner's next free slot.
    Add,
    /// Append a new version to an existing slot.
    Change,
    /// Arm the picture flow for (owner, slot).
    SetPicture,
    /// Resolve and render one sheet with navigation glyphs.
    Show,
    /// Reassign a sheet to another owner.
    Move,
    /// Soft-delete a slot.
    Delete,
    /// Undo the last edit of a slot.
    DeleteLast,
    /// Field-keyed search across sheets.
    Search,
    /// Paginated owner roster.
    List,
    /// Dice roller.
    Dice,
    /// Coin flip.
    Coin,
    /// Grant authorization.
    Auth,
    /// Revoke authorization.
    Unauth,
    /// Admin: set a canned reply.
    SetCommand,
    /// Admin: set a canned reply's keyboards.
    SetCommandKeyboards,
    /// Admin: set a canned reply's alternate triggers.
    SetCommandAltCommands,
    /// Send the character template.
    Template,
    /// Send usage examples.
    MoreExamples,
    /// Canned replies and the unknown-command fallback.
    Static,
}
