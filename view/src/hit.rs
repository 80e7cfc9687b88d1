// Hit resolution and the hit state machine (spec.md §4.5).

use support::{Rect, Vec2};

use crate::events::{EventQueue, Events, HitInfo, ScrollInfo};
use crate::ids::ViewId;
use crate::input::InputState;
use crate::tree::ViewTree;
use crate::view::ViewHitAttributes;

impl ViewTree {
    /// Walks `z_ord` in reverse to find the topmost non-hidden view whose
    /// canvas rectangle contains `pos`, then bubbles up the ancestor chain
    /// for the nearest view matching `required` ("bubble hit").
    pub fn hit_index(&self, pos: Vec2, required: ViewHitAttributes) -> Option<u32> {
        for &i in self.z_ord.iter().rev() {
            let idx = i as usize;
            if self.hidden[idx] {
                continue;
            }
            let rect = Rect::new(self.canvas_center[idx], self.canvas_extent[idx]);
            if !rect.contains(pos) {
                continue;
            }
            let mut cur = Some(i);
            while let Some(c) = cur {
                if self.attributes[c as usize].intersects(required) {
                    return Some(c);
                }
                cur = self.parent[c as usize];
            }
            return None;
        }
        None
    }
}

/// Cross-frame pointer state, resolved against the current frame's tree
/// at the start of each `tick` (spec.md §4.5).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HitState {
    #[default]
    None,
    Point {
        tgt: ViewId,
    },
    Drag {
        seq: DragSeqState,
        src: ViewId,
        tgt: Option<ViewId>,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DragSeqState {
    Start,
    Update,
}

fn hidden_or_gone(tree: &ViewTree, id: ViewId) -> bool {
    match tree.index_of(id) {
        Some(idx) => tree.hidden[idx as usize],
        None => true,
    }
}

/// Emits `PointerIn`/`PointerOver`/`PointerOut` against `new_id` relative
/// to whatever the previous frame's target was: `PointerOver` fires every
/// frame a target is hit, `PointerIn`/`PointerOut` only fire on a target
/// change (or first entry, when `prev_tgt` is `None`).
fn diff_pointer_events(events: &mut EventQueue, prev_tgt: Option<ViewId>, new_id: ViewId, hit: HitInfo, extra: Events) {
    if prev_tgt != Some(new_id) {
        if let Some(old) = prev_tgt {
            events.push(old, Events::POINTER_OUT);
        }
        events.push_hit(new_id, Events::POINTER_IN | Events::POINTER_OVER | extra, hit);
    } else {
        events.push_hit(new_id, Events::POINTER_OVER | extra, hit);
    }
}

fn diff_scroll_events(events: &mut EventQueue, prev_tgt: Option<ViewId>, new_id: ViewId, info: ScrollInfo) {
    if prev_tgt != Some(new_id) {
        if let Some(old) = prev_tgt {
            events.push(old, Events::POINTER_OUT);
        }
        events.push_scroll(new_id, Events::POINTER_IN | Events::POINTER_OVER | Events::SCROLL, info);
    } else {
        events.push_scroll(new_id, Events::POINTER_OVER | Events::SCROLL, info);
    }
}

/// Resolves one frame's pointer target from scratch against `prev_tgt`
/// (`None` when there was no prior target, `Some` for continuous hover):
/// scroll, then primary-held/down, then the default pointable check, each
/// falling through to the next on a miss rather than returning `None`
/// early (`view_system.cc` `point_seq`, called every frame regardless of
/// the previously resolved state — continuous hover and hover-target
/// changes are first-class, not special-cased).
fn resolve_point(tree: &ViewTree, prev_tgt: Option<ViewId>, input: &InputState, events: &mut EventQueue) -> HitState {
    if input.mouse.scrolled {
        if let Some(idx) = tree.hit_index(input.mouse.position, ViewHitAttributes::SCROLLABLE) {
            let id = tree.ids[idx as usize].expect("hit view has a resolved id");
            let center = tree.viewport_center[idx as usize].unwrap_or_default() + input.mouse.wheel * -1.0;
            let zoom = tree.viewport_zoom[idx as usize].unwrap_or(1.0);
            diff_scroll_events(events, prev_tgt, id, ScrollInfo { center, zoom });
            return HitState::Point { tgt: id };
        }
    }

    if input.mouse.primary.held || input.mouse.primary.down {
        let draggable_or_clickable = ViewHitAttributes::DRAGGABLE | ViewHitAttributes::CLICKABLE;
        if let Some(idx) = tree.hit_index(input.mouse.position, draggable_or_clickable) {
            let attrs = tree.attributes[idx as usize];
            let id = tree.ids[idx as usize].expect("hit view has a resolved id");
            if attrs.contains(ViewHitAttributes::DRAGGABLE) {
                events.push(id, Events::DRAG_START | Events::DRAG_UPDATE);
                return HitState::Drag {
                    seq: DragSeqState::Start,
                    src: id,
                    tgt: None,
                };
            }
            let hit = HitInfo {
                canvas_pos: input.mouse.position,
            };
            diff_pointer_events(events, prev_tgt, id, hit, Events::POINTER_DOWN);
            return HitState::Point { tgt: id };
        }
    }

    match tree.hit_index(input.mouse.position, ViewHitAttributes::POINTABLE) {
        Some(idx) => {
            let id = tree.ids[idx as usize].expect("hit view has a resolved id");
            let hit = HitInfo {
                canvas_pos: input.mouse.position,
            };
            let extra = if input.mouse.any_up { Events::POINTER_UP } else { Events::empty() };
            diff_pointer_events(events, prev_tgt, id, hit, extra);
            HitState::Point { tgt: id }
        }
        None => {
            if let Some(old) = prev_tgt {
                events.push(old, Events::POINTER_OUT);
            }
            HitState::None
        }
    }
}

/// Runs the hit-test transition table once per frame, emitting events and
/// returning the next cross-frame `HitState`.
pub fn drive_hit_state(
    tree: &ViewTree,
    prev: &HitState,
    input: &InputState,
    events: &mut EventQueue,
) -> HitState {
    let esc_held = input.keyboard.key(crate::input::Key::Escape).held;

    // Resolve any view-id the previous state referenced; an unresolved id
    // (the view vanished) soft-fails back toward `None`.
    let prev = match prev {
        HitState::Point { tgt } if tree.index_of(*tgt).is_none() => HitState::None,
        HitState::Drag { src, .. } if tree.index_of(*src).is_none() => HitState::None,
        other => other.clone(),
    };

    if !input.mouse.focused {
        if let HitState::Drag { src, .. } = &prev {
            events.push(*src, Events::DRAG_END);
        }
        return HitState::None;
    }

    match prev {
        HitState::None => resolve_point(tree, None, input, events),

        HitState::Point { tgt } => {
            if hidden_or_gone(tree, tgt) {
                HitState::None
            } else {
                resolve_point(tree, Some(tgt), input, events)
            }
        }

        HitState::Drag { seq: DragSeqState::Start, src, .. } => {
            if hidden_or_gone(tree, src) || esc_held {
                events.push(src, Events::DRAG_END);
                HitState::None
            } else if !input.mouse.primary.held {
                let tgt = tree.hit_index(input.mouse.position, ViewHitAttributes::DROPPABLE);
                events.push(src, Events::DRAG_END);
                if let Some(idx) = tgt {
                    let tgt_id = tree.ids[idx as usize].expect("hit view has a resolved id");
                    events.push(tgt_id, Events::DRAG_IN | Events::DRAG_OVER | Events::DROP);
                }
                HitState::None
            } else {
                let tgt = tree.hit_index(input.mouse.position, ViewHitAttributes::DROPPABLE);
                events.push(src, Events::DRAG_UPDATE);
                if let Some(idx) = tgt {
                    let tgt_id = tree.ids[idx as usize].expect("hit view has a resolved id");
                    events.push(tgt_id, Events::DRAG_IN | Events::DRAG_OVER);
                }
                HitState::Drag {
                    seq: DragSeqState::Update,
                    src,
                    tgt: tgt.map(|idx| tree.ids[idx as usize].expect("hit view has a resolved id")),
                }
            }
        }

        HitState::Drag { seq: DragSeqState::Update, src, tgt } => {
            if hidden_or_gone(tree, src) || esc_held {
                events.push(src, Events::DRAG_END);
                HitState::None
            } else if !input.mouse.primary.held {
                events.push(src, Events::DRAG_END);
                if let Some(tgt_id) = tgt {
                    events.push(tgt_id, Events::DROP);
                }
                HitState::None
            } else {
                let new_tgt = tree.hit_index(input.mouse.position, ViewHitAttributes::DROPPABLE);
                let new_tgt_id = new_tgt.map(|idx| tree.ids[idx as usize].expect("hit view has a resolved id"));
                events.push(src, Events::DRAG_UPDATE);
                if new_tgt_id != tgt {
                    if let Some(old) = tgt {
                        events.push(old, Events::DRAG_OUT);
                    }
                    if let Some(new) = new_tgt_id {
                        events.push(new, Events::DRAG_IN | Events::DRAG_OVER);
                    }
                } else if let Some(same) = new_tgt_id {
                    events.push(same, Events::DRAG_OVER);
                }
                HitState::Drag {
                    seq: DragSeqState::Update,
                    src,
                    tgt: new_tgt_id,
                }
            }
        }
    }
}
