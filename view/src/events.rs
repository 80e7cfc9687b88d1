use std::collections::HashMap;

use bitflags::bitflags;
use support::Vec2;

use crate::ids::ViewId;

bitflags! {
    /// Every event kind the core can compose onto a view in a single frame.
    #[derive(Default)]
    pub struct Events: u32 {
        const MOUNT        = 1 << 0;
        const POINTER_IN   = 1 << 1;
        const POINTER_OUT  = 1 << 2;
        const POINTER_OVER = 1 << 3;
        const POINTER_DOWN = 1 << 4;
        const POINTER_UP   = 1 << 5;
        const SCROLL       = 1 << 6;
        const DRAG_START   = 1 << 7;
        const DRAG_UPDATE  = 1 << 8;
        const DRAG_END     = 1 << 9;
        const DRAG_IN      = 1 << 10;
        const DRAG_OUT     = 1 << 11;
        const DRAG_OVER    = 1 << 12;
        const DROP         = 1 << 13;
        const FOCUS_IN     = 1 << 14;
        const FOCUS_OUT    = 1 << 15;
        const FOCUS_OVER   = 1 << 16;
        const KEY_DOWN     = 1 << 17;
        const KEY_UP       = 1 << 18;
        const TEXT_INPUT   = 1 << 19;
    }
}

/// Hit position payload carried alongside `PointerDown`/`PointerUp`/
/// `PointerOver` and the drag event family.
#[derive(Debug, Default, Copy, Clone)]
pub struct HitInfo {
    pub canvas_pos: Vec2,
}

/// Carried alongside `Scroll`: the viewport's new center and zoom, already
/// resolved by the hit or focus state machine.
#[derive(Debug, Default, Copy, Clone)]
pub struct ScrollInfo {
    pub center: Vec2,
    pub zoom: f32,
}

#[derive(Debug, Default, Clone)]
pub struct ViewEvents {
    pub events: Events,
    pub hit: Option<HitInfo>,
    pub scroll: Option<ScrollInfo>,
}

impl ViewEvents {
    pub fn insert(&mut self, events: Events) {
        self.events.insert(events);
    }
}

/// Per-frame `ViewId -> Events` mapping. Drained into the views it
/// addresses during the next frame's build pass; entries whose owning
/// view has vanished are discarded silently (spec.md §3).
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: HashMap<ViewId, ViewEvents>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: ViewId, events: Events) {
        self.pending.entry(id).or_default().insert(events);
    }

    pub fn push_hit(&mut self, id: ViewId, events: Events, hit: HitInfo) {
        let entry = self.pending.entry(id).or_default();
        entry.insert(events);
        entry.hit = Some(hit);
    }

    pub fn push_scroll(&mut self, id: ViewId, events: Events, scroll: ScrollInfo) {
        let entry = self.pending.entry(id).or_default();
        entry.insert(events);
        entry.scroll = Some(scroll);
    }

    /// Removes and returns this view's queued events, if any. Called once
    /// per view per frame during the build pass (spec.md §4.1).
    pub fn drain(&mut self, id: ViewId) -> ViewEvents {
        self.pending.remove(&id).unwrap_or_default()
    }
}
