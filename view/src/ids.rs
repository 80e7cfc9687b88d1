use std::num::NonZeroU64;

/// Stable identity for a view, assigned on first mount and retained across
/// frames for as long as the view keeps appearing in the tree. IDs are
/// never reused for the life of a [`IdAllocator`]; absence of an id is
/// modeled as `Option<ViewId>` rather than a sentinel value.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(NonZeroU64);

impl ViewId {
    pub fn raw(self) -> u64 {
        self.0.get()
    }
}

#[derive(Debug, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    pub fn alloc(&mut self) -> ViewId {
        self.next += 1;
        ViewId(NonZeroU64::new(self.next).expect("allocator counter starts above zero"))
    }
}
