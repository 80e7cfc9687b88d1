// The flattened per-frame tree (spec.md §3). Arrays are cleared and
// repopulated by depth-first traversal every frame; nothing here survives
// past the frame except the id allocator itself.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use support::{Affine2, Rect, Vec2};

use crate::events::{EventQueue, Events, ViewEvents};
use crate::ids::{IdAllocator, ViewId};
use crate::input::InputState;
use crate::view::{CursorIcon, TextInputDescriptor, TickContext, View, ViewHitAttributes};

#[derive(Debug, Copy, Clone, Default)]
pub struct ChildRange {
    pub begin: u32,
    pub span: u32,
}

impl ChildRange {
    pub fn iter(&self) -> std::ops::Range<u32> {
        self.begin..(self.begin + self.span)
    }
}

/// The tree's parallel arrays, indexed by the dense per-frame index `i`.
pub struct ViewTree {
    pub views: Vec<Rc<RefCell<dyn View>>>,
    pub ids: Vec<Option<ViewId>>,
    pub depth: Vec<u16>,
    pub parent: Vec<Option<u32>>,
    pub children: Vec<ChildRange>,
    pub tab_idx: Vec<u32>,
    pub viewport: Vec<Option<u32>>,
    pub is_viewport: Vec<bool>,
    pub hidden: Vec<bool>,
    pub attributes: Vec<ViewHitAttributes>,
    pub focusable: Vec<bool>,
    pub input: Vec<Option<TextInputDescriptor>>,
    pub extent: Vec<Vec2>,
    pub center: Vec<Vec2>,
    pub viewport_extent: Vec<Option<Vec2>>,
    pub viewport_center: Vec<Option<Vec2>>,
    pub viewport_zoom: Vec<Option<f32>>,
    pub fixed_center: Vec<Option<Vec2>>,
    pub fixed_override: Vec<Option<Vec2>>,
    pub z_idx: Vec<i32>,
    pub layer: Vec<i32>,
    pub canvas_xfm: Vec<Affine2>,
    pub canvas_inv_xfm: Vec<Affine2>,
    pub canvas_center: Vec<Vec2>,
    pub canvas_extent: Vec<Vec2>,
    pub clip: Vec<Rect>,
    pub z_ord: Vec<u32>,
    pub focus_ord: Vec<u32>,
    pub focus_idx: Vec<u32>,
    pub grab_focus_target: Option<u32>,

    id_alloc: IdAllocator,
    next_tab_idx: u32,
    id_index: HashMap<ViewId, u32>,
}

impl Default for ViewTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewTree {
    pub fn new() -> Self {
        Self {
            views: Vec::new(),
            ids: Vec::new(),
            depth: Vec::new(),
            parent: Vec::new(),
            children: Vec::new(),
            tab_idx: Vec::new(),
            viewport: Vec::new(),
            is_viewport: Vec::new(),
            hidden: Vec::new(),
            attributes: Vec::new(),
            focusable: Vec::new(),
            input: Vec::new(),
            extent: Vec::new(),
            center: Vec::new(),
            viewport_extent: Vec::new(),
            viewport_center: Vec::new(),
            viewport_zoom: Vec::new(),
            fixed_center: Vec::new(),
            fixed_override: Vec::new(),
            z_idx: Vec::new(),
            layer: Vec::new(),
            canvas_xfm: Vec::new(),
            canvas_inv_xfm: Vec::new(),
            canvas_center: Vec::new(),
            canvas_extent: Vec::new(),
            clip: Vec::new(),
            z_ord: Vec::new(),
            focus_ord: Vec::new(),
            focus_idx: Vec::new(),
            grab_focus_target: None,
            id_alloc: IdAllocator::new(),
            next_tab_idx: 0,
            id_index: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    fn clear(&mut self) {
        self.views.clear();
        self.ids.clear();
        self.depth.clear();
        self.parent.clear();
        self.children.clear();
        self.tab_idx.clear();
        self.viewport.clear();
        self.is_viewport.clear();
        self.hidden.clear();
        self.attributes.clear();
        self.focusable.clear();
        self.input.clear();
        self.extent.clear();
        self.center.clear();
        self.viewport_extent.clear();
        self.viewport_center.clear();
        self.viewport_zoom.clear();
        self.fixed_center.clear();
        self.fixed_override.clear();
        self.z_idx.clear();
        self.layer.clear();
        self.canvas_xfm.clear();
        self.canvas_inv_xfm.clear();
        self.canvas_center.clear();
        self.canvas_extent.clear();
        self.clip.clear();
        self.z_ord.clear();
        self.focus_ord.clear();
        self.focus_idx.clear();
        self.grab_focus_target = None;
        self.next_tab_idx = 0;
    }

    fn reserve(&mut self, parent: Option<u32>, depth: u16, viewport: Option<u32>, view: Rc<RefCell<dyn View>>) -> u32 {
        let idx = self.views.len() as u32;
        self.views.push(view);
        self.ids.push(None);
        self.depth.push(depth);
        self.parent.push(parent);
        self.children.push(ChildRange::default());
        self.tab_idx.push(0);
        self.viewport.push(viewport);
        self.is_viewport.push(false);
        self.hidden.push(false);
        self.attributes.push(ViewHitAttributes::empty());
        self.focusable.push(false);
        self.input.push(None);
        self.extent.push(Vec2::ZERO);
        self.center.push(Vec2::ZERO);
        self.viewport_extent.push(None);
        self.viewport_center.push(None);
        self.viewport_zoom.push(None);
        self.fixed_center.push(None);
        self.fixed_override.push(None);
        self.z_idx.push(0);
        self.layer.push(0);
        self.canvas_xfm.push(Affine2::identity());
        self.canvas_inv_xfm.push(Affine2::identity());
        self.canvas_center.push(Vec2::ZERO);
        self.canvas_extent.push(Vec2::ZERO);
        self.clip.push(Rect::new(Vec2::ZERO, Vec2::ZERO));
        idx
    }

    /// Rebuilds the tree from `root`, invoking `tick` depth-first
    /// (spec.md §4.1). Must run before layout/stacking/hit/focus each
    /// frame.
    pub fn build(
        &mut self,
        root: Rc<RefCell<dyn View>>,
        input: &InputState,
        frame_id: u64,
        events: &mut EventQueue,
    ) {
        self.clear();
        let root_idx = self.reserve(None, 0, None, root);
        self.recurse(root_idx, input, frame_id, events);

        self.id_index.clear();
        for (idx, id) in self.ids.iter().enumerate() {
            if let Some(id) = id {
                self.id_index.insert(*id, idx as u32);
            }
        }
    }

    /// Resolves a cross-frame [`ViewId`] to this frame's dense index, if
    /// the view it names still appears in the tree (spec.md §3,
    /// `Unmapped`: soft-fails to `None`).
    pub fn index_of(&self, id: ViewId) -> Option<u32> {
        self.id_index.get(&id).copied()
    }

    fn recurse(&mut self, idx: u32, input: &InputState, frame_id: u64, events: &mut EventQueue) {
        let view_rc = self.views[idx as usize].clone();

        let view_events = {
            let mut view = view_rc.borrow_mut();
            match view.id() {
                Some(id) => events.drain(id),
                None => {
                    let id = self.id_alloc.alloc();
                    view.set_id(id);
                    let mut ve = ViewEvents::default();
                    ve.insert(Events::MOUNT);
                    ve
                }
            }
        };
        self.ids[idx as usize] = view_rc.borrow().id();
        view_rc.borrow_mut().set_hot(false);

        let depth = self.depth[idx as usize];
        let viewport = self.viewport[idx as usize];
        let mut builder = Builder {
            tree: self,
            parent: idx,
            depth,
            viewport,
            first_child: None,
            count: 0,
        };

        let ctx = TickContext { input, frame_id };
        let state = view_rc.borrow_mut().tick(&ctx, &view_events, &mut builder);
        let first_child = builder.first_child;
        let count = builder.count;

        self.tab_idx[idx as usize] = state.tab_idx.unwrap_or(self.next_tab_idx);
        self.next_tab_idx += 1;
        self.is_viewport[idx as usize] = state.viewport;
        self.hidden[idx as usize] = state.hidden;
        self.attributes[idx as usize] = state.attributes;
        self.focusable[idx as usize] = state.focusable;
        self.input[idx as usize] = state.input;
        self.fixed_override[idx as usize] = state.fixed_center_override;

        if let Some(begin) = first_child {
            self.children[idx as usize] = ChildRange { begin, span: count };
            if state.viewport {
                for c in begin..(begin + count) {
                    self.viewport[c as usize] = Some(idx);
                }
            }
        }

        if state.grab_focus && !state.hidden && state.focusable {
            self.grab_focus_target = Some(idx);
        }

        if let Some(begin) = first_child {
            for c in begin..(begin + count) {
                self.recurse(c, input, frame_id, events);
            }
        }
    }

    pub fn cursor_icon(&self, idx: u32) -> CursorIcon {
        self.views[idx as usize].borrow().cursor()
    }

    /// Checks Properties A, D, and E directly against the current frame's
    /// arrays. Not called in the normal pipeline (layout/stacking already
    /// enforce these by construction); exists for tests and debug builds
    /// to assert against a regression.
    pub fn check_invariants(&self) -> Result<(), crate::error::ViewTreeError> {
        use crate::error::ViewTreeError;

        for i in 1..self.len() as u32 {
            let parent = self.parent[i as usize].expect("non-root view has a parent");
            if parent >= i {
                return Err(ViewTreeError::ParentNotBeforeChild { index: i, parent });
            }
            let range = self.children[parent as usize];
            if !range.iter().any(|c| c == i) {
                return Err(ViewTreeError::NotInParentChildRange { index: i });
            }
            if self.hidden[parent as usize] && !self.hidden[i as usize] {
                return Err(ViewTreeError::HiddenNotInherited { index: i, parent });
            }
            if let Some(vp) = self.viewport[i as usize] {
                let own = Rect::new(self.canvas_center[i as usize], self.canvas_extent[i as usize]);
                let parent_clip = self.clip[vp as usize];
                if self.is_viewport[i as usize] {
                    let intersected = own.intersect(&parent_clip);
                    if intersected != self.clip[i as usize] {
                        return Err(ViewTreeError::ClipNotContained { index: i });
                    }
                }
            }
        }
        Ok(())
    }
}

/// The inversion-of-control handle threaded into [`View::tick`]; calling
/// `add` appends a child under the currently-ticking view (spec.md §9).
pub struct Builder<'a> {
    tree: &'a mut ViewTree,
    parent: u32,
    depth: u16,
    viewport: Option<u32>,
    first_child: Option<u32>,
    count: u32,
}

impl<'a> Builder<'a> {
    pub fn add(&mut self, view: Rc<RefCell<dyn View>>) -> u32 {
        let idx = self.tree.reserve(Some(self.parent), self.depth + 1, self.viewport, view);
        if self.first_child.is_none() {
            self.first_child = Some(idx);
        }
        self.count += 1;
        idx
    }
}
