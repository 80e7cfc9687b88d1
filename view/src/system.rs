// The top-level per-frame driver (spec.md §4.1 step, §6 "Run loop").

use std::cell::RefCell;
use std::rc::Rc;

use support::Result;

use crate::collab::Canvas;
use crate::events::EventQueue;
use crate::focus::{drive_focus_state, FocusState};
use crate::hit::{drive_hit_state, HitState};
use crate::input::InputState;
use crate::tree::ViewTree;
use crate::view::View;

/// Owns the tree and every piece of cross-frame state the core retains:
/// the event queue, the hit and focus state machines, and the frame
/// counter (spec.md §3, "Lifetimes").
pub struct ViewSystem {
    tree: ViewTree,
    events: EventQueue,
    hit_state: HitState,
    focus_state: FocusState,
    frame_id: u64,
}

impl Default for ViewSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewSystem {
    pub fn new() -> Self {
        Self {
            tree: ViewTree::new(),
            events: EventQueue::new(),
            hit_state: HitState::default(),
            focus_state: FocusState::default(),
            frame_id: 0,
        }
    }

    pub fn tree(&self) -> &ViewTree {
        &self.tree
    }

    pub fn frame_id(&self) -> u64 {
        self.frame_id
    }

    /// Runs one full frame: build, layout, stack, cull, render, then the
    /// hit and focus state machines, in the order `tick` specifies
    /// (spec.md §4, end-to-end "run loop" in §6).
    pub fn tick(&mut self, input: &InputState, root: Rc<RefCell<dyn View>>, canvas: &mut dyn Canvas) {
        self.tree.build(root, input, self.frame_id, &mut self.events);

        self.tree.layout(input.window_extent);
        self.tree.stack();
        self.tree.visibility();
        self.tree.render(canvas);

        self.tree.focus_order();

        self.hit_state = drive_hit_state(&self.tree, &self.hit_state, input, &mut self.events);
        self.focus_state = drive_focus_state(&self.tree, &self.focus_state, input, &mut self.events);

        self.frame_id += 1;
    }
}

/// Drives `view_system.tick` every iteration until `per_frame` or the
/// input's `closing` bit says to stop (spec.md §6, "Run loop").
///
/// `per_frame` carries the host's own fallible work (asset loads, swapchain
/// acquisition, …) and reports back whether to keep looping; an error
/// propagates out of `run` immediately, matching the teacher's
/// `render_frame`/`commit`-style per-frame functions (`Result<()>`) rather
/// than swallowing host failures.
pub fn run<F>(
    system: &mut ViewSystem,
    root: Rc<RefCell<dyn View>>,
    canvas: &mut dyn Canvas,
    mut poll_input: impl FnMut() -> InputState,
    mut per_frame: F,
) -> Result<()>
where
    F: FnMut(&InputState) -> Result<bool>,
{
    loop {
        let input = poll_input();
        let should_continue = per_frame(&input)?;
        let closing = input.closing;
        system.tick(&input, root.clone(), canvas);
        if closing || !should_continue {
            break;
        }
    }
    Ok(())
}
