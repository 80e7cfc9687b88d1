// Focus order and the focus state machine (spec.md §4.2, §4.6).

use crate::events::{EventQueue, Events, ScrollInfo};
use crate::ids::ViewId;
use crate::input::{InputState, Key};
use crate::tree::ViewTree;

impl ViewTree {
    /// Fills `focus_ord`/`focus_idx`: a stable sort of every index by
    /// `tab_idx`, plus its inverse permutation (Property B).
    pub fn focus_order(&mut self) {
        if self.is_empty() {
            return;
        }
        self.focus_ord = (0..self.len() as u32).collect();
        let tab_idx = &self.tab_idx;
        self.focus_ord.sort_by_key(|&i| tab_idx[i as usize]);
        self.focus_idx = vec![0; self.len()];
        for (k, &i) in self.focus_ord.iter().enumerate() {
            self.focus_idx[i as usize] = k as u32;
        }
    }
}

/// Advances cyclically through `focus_ord` from `start`, returning the
/// first non-hidden focusable view; if none exists, returns `start`
/// (spec.md §4.2).
pub fn navigate_focus(tree: &ViewTree, start: u32, forward: bool) -> u32 {
    if tree.is_empty() {
        return start;
    }
    let n = tree.len() as u32;
    let start_k = tree.focus_idx[start as usize];
    let mut k = start_k;
    for _ in 0..n {
        k = if forward { (k + 1) % n } else { (k + n - 1) % n };
        let idx = tree.focus_ord[k as usize];
        if !tree.hidden[idx as usize] && tree.focusable[idx as usize] {
            return idx;
        }
        if k == start_k {
            break;
        }
    }
    start
}

/// Cross-frame focus target: the view id currently focused and whether
/// focus is active (as opposed to merely remembered).
#[derive(Debug, Clone, Copy, Default)]
pub struct FocusState {
    pub tgt: Option<ViewId>,
    pub active: bool,
}

/// Runs the focus transition table once per frame, emitting `FocusIn`/
/// `FocusOut`/`FocusOver`/key/text events and returning the next
/// cross-frame [`FocusState`].
pub fn drive_focus_state(
    tree: &ViewTree,
    prev: &FocusState,
    input: &InputState,
    events: &mut EventQueue,
) -> FocusState {
    let prev_idx = prev.tgt.and_then(|id| tree.index_of(id));
    let mut idx = prev_idx.unwrap_or(0);
    let mut active = prev.active && prev_idx.is_some();

    if let Some(grab) = tree.grab_focus_target {
        idx = grab;
        active = true;

        // Starts at the grab target itself, not its enclosing viewport:
        // `fixed_center[walker]` is read from the *current* walker before
        // advancing to `viewport[walker]`, so the target's own fixed
        // center is the first one emitted (`view_system.cc` `focus_on`).
        let mut walker = Some(grab);
        while let Some(w) = walker {
            if let Some(id) = tree.ids[w as usize] {
                let zoom = tree.viewport_zoom[w as usize].unwrap_or(1.0);
                let center = tree.fixed_center[w as usize].unwrap_or_default();
                events.push_scroll(id, Events::SCROLL, ScrollInfo { center, zoom });
            }
            walker = tree.viewport[w as usize];
        }
    } else if active {
        let tab = input.keyboard.key(Key::Tab);
        let accepts_tab_input = tree.input[idx as usize].map(|d| d.tab_input).unwrap_or(false);
        if tab.down && !accepts_tab_input {
            idx = navigate_focus(tree, idx, !input.keyboard.modifiers.shift);
        }
    }

    let new_id = tree.ids[idx as usize];
    let now_inactive = !active || tree.hidden[idx as usize] || !tree.focusable[idx as usize];

    if let Some(prev_id) = prev.tgt {
        let differs = new_id != Some(prev_id);
        if prev.active && (now_inactive || differs) {
            events.push(prev_id, Events::FOCUS_OUT);
        }
    }

    if !now_inactive {
        if let Some(id) = new_id {
            if prev.tgt != new_id || !prev.active {
                events.push(id, Events::FOCUS_IN);
            }
            events.push(id, Events::FOCUS_OVER);
            if input.keyboard.any_down {
                events.push(id, Events::KEY_DOWN);
            }
            if input.keyboard.any_up {
                events.push(id, Events::KEY_UP);
            }
            if !input.keyboard.text.is_empty() {
                events.push(id, Events::TEXT_INPUT);
            }
        }
    }

    FocusState {
        tgt: new_id,
        active: !now_inactive,
    }
}
