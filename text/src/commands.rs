use support::Vec2;

/// The full command alphabet the compositor understands. `Select*` variants
/// share the same 14 motions as their non-selecting counterparts but extend
/// `cursor.last` instead of collapsing the selection.
///
/// Not `Copy`: `InputText` carries the codepoints to insert, so dispatching
/// real or IME text through `TextCompositor::command` doesn't require a
/// second, payload-carrying entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextCommand {
    None,
    Escape,

    BackSpace,
    Delete,

    Left,
    Right,
    Up,
    Down,
    WordStart,
    WordEnd,
    LineStart,
    LineEnd,
    PageUp,
    PageDown,

    SelectLeft,
    SelectRight,
    SelectUp,
    SelectDown,
    SelectWordStart,
    SelectWordEnd,
    SelectLineStart,
    SelectLineEnd,
    SelectPageUp,
    SelectPageDown,

    SelectCodepoint,
    SelectWord,
    SelectLine,
    SelectAll,

    Cut,
    Copy,
    Paste,

    Undo,
    Redo,

    HitCodepoint,
    HitWord,
    HitLine,
    HitAll,
    Drag,

    InputText(Vec<u32>),
    NewLine,
    Tab,
    Submit,
    Unselect,
}

/// Which side of a codepoint boundary a caret sits on; relevant for
/// bidirectional text where a single caret index has two on-screen spots.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CaretAlignment {
    Left,
    Right,
}

/// The laid-out text block the compositor hit-tests and navigates against.
/// Produced externally by a text shaper; the compositor never shapes text
/// itself (out of scope, see spec.md §1).
pub trait TextLayout {
    /// Overall extent of the laid-out block.
    fn extent(&self) -> Vec2;

    /// Resolves a canvas-space position to the nearest codepoint and which
    /// side of it the position landed on.
    fn hit(&self, pos: Vec2) -> (i64, CaretAlignment);

    /// Number of laid-out lines (after wrapping), at least 1.
    fn line_count(&self) -> u32;

    /// The line index containing `codepoint`.
    fn line_of(&self, codepoint: u32) -> u32;

    /// The codepoint range covered by `line`.
    fn line_range(&self, line: u32) -> crate::cursor::Slice;

    /// Canvas-space position of the caret at `codepoint`, used to preserve
    /// horizontal alignment across `Up`/`Down`/`PageUp`/`PageDown`.
    fn caret_position(&self, codepoint: u32, alignment: CaretAlignment) -> Vec2;
}

/// OS clipboard collaborator; accessed only from `Cut`/`Copy`/`Paste`.
pub trait Clipboard {
    fn get(&mut self) -> Vec<u8>;
    fn set(&mut self, bytes: &[u8]);
}
