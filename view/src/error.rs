use thiserror::Error;

/// Internal consistency failures in the flattened tree (spec.md §7,
/// `InvariantViolation`). These can only arise from a bug in the tree
/// builder itself, never from caller input, so callers are expected to
/// treat them as fatal rather than route them through normal error
/// handling; [`ViewTree::check_invariants`](crate::tree::ViewTree) exists
/// mainly so tests can assert Properties A/D/E directly.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewTreeError {
    #[error("view {index} has parent {parent} which is not topologically before it")]
    ParentNotBeforeChild { index: u32, parent: u32 },

    #[error("view {index} does not appear in its recorded parent's child range")]
    NotInParentChildRange { index: u32 },

    #[error("view {index}'s clip rectangle is not contained in its viewport's clip rectangle")]
    ClipNotContained { index: u32 },

    #[error("view {index}'s parent {parent} is hidden but view {index} is not")]
    HiddenNotInherited { index: u32, parent: u32 },
}
