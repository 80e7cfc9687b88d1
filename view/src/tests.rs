use std::cell::RefCell;
use std::rc::Rc;

use support::{Rect, Vec2};

use crate::collab::Canvas;
use crate::events::{Events, EventQueue, ViewEvents};
use crate::hit::{drive_hit_state, DragSeqState, HitState};
use crate::ids::ViewId;
use crate::input::{InputState, Key, KeyState};
use crate::scalar::parse_scalar;
use crate::size::{Frame, Size};
use crate::tree::{Builder, ViewTree};
use crate::view::{CursorIcon, Layout, State, TextInputDescriptor, TickContext, View, ViewBase, ViewHitAttributes};

/// A minimal view used across these tests: fixed frame, a declared list of
/// children to add on every `tick`, and whatever hit/focus attributes the
/// test configures. Stands in for the production widgets spec.md's view
/// system is meant to host.
struct Node {
    base: ViewBase,
    frame: Frame,
    attributes: ViewHitAttributes,
    focusable: bool,
    hidden: RefCell<bool>,
    tab_idx: Option<u32>,
    viewport: bool,
    viewport_zoom: Option<f32>,
    grab_focus: RefCell<bool>,
    input: Option<TextInputDescriptor>,
    children: Vec<Rc<RefCell<Node>>>,
}

impl Node {
    fn leaf(w: f32, h: f32) -> Rc<RefCell<Node>> {
        Rc::new(RefCell::new(Node {
            base: ViewBase::default(),
            frame: Frame::new(Size::fixed(w), Size::fixed(h)),
            attributes: ViewHitAttributes::empty(),
            focusable: false,
            hidden: RefCell::new(false),
            tab_idx: None,
            viewport: false,
            viewport_zoom: None,
            grab_focus: RefCell::new(false),
            input: None,
            children: Vec::new(),
        }))
    }

    fn with_children(w: f32, h: f32, children: Vec<Rc<RefCell<Node>>>) -> Rc<RefCell<Node>> {
        let node = Node::leaf(w, h);
        node.borrow_mut().children = children;
        node
    }
}

struct NullCanvas;

impl Canvas for NullCanvas {
    fn rrect(&mut self, _region: Rect, _clip: Rect, _radius: f32, _color: [f32; 4]) {}
    fn brect(&mut self, _region: Rect, _clip: Rect, _color: [f32; 4]) {}
    fn squircle(&mut self, _region: Rect, _clip: Rect, _color: [f32; 4]) {}
    fn circle(&mut self, _region: Rect, _clip: Rect, _color: [f32; 4]) {}
    fn image(&mut self, _region: Rect, _clip: Rect, _texture: u16) {}
}

impl View for Node {
    fn id(&self) -> Option<ViewId> {
        self.base.id
    }

    fn set_id(&mut self, id: ViewId) {
        self.base.id = Some(id);
    }

    fn hot(&self) -> bool {
        self.base.hot
    }

    fn set_hot(&mut self, hot: bool) {
        self.base.hot = hot;
    }

    fn tick(&mut self, _ctx: &TickContext, _events: &ViewEvents, build: &mut Builder) -> State {
        for child in &self.children {
            build.add(child.clone());
        }
        State {
            tab_idx: self.tab_idx,
            input: self.input,
            hidden: *self.hidden.borrow(),
            attributes: self.attributes,
            focusable: self.focusable,
            viewport: self.viewport,
            grab_focus: *self.grab_focus.borrow(),
            defer_close: false,
            fixed_center_override: None,
        }
    }

    fn size(&mut self, proposed: Vec2, child_extents: &mut [Vec2]) {
        for e in child_extents.iter_mut() {
            *e = proposed;
        }
    }

    fn fit(&mut self, proposed: Vec2, _child_extents: &[Vec2], child_centers: &mut [Vec2]) -> Layout {
        for c in child_centers.iter_mut() {
            *c = Vec2::ZERO;
        }
        Layout {
            extent: self.frame.resolve(proposed),
            viewport_extent: if self.viewport { Some(proposed) } else { None },
            viewport_center: if self.viewport { Some(Vec2::ZERO) } else { None },
            viewport_zoom: if self.viewport { Some(self.viewport_zoom.unwrap_or(1.0)) } else { None },
            fixed_center: if self.viewport { Some(Vec2::ZERO) } else { None },
        }
    }

    fn render(&mut self, _canvas: &mut dyn Canvas, _region: Rect, _canvas_region: Rect, _clip: Rect) {}

    fn cursor(&self) -> CursorIcon {
        CursorIcon::Default
    }
}

fn default_input() -> InputState {
    InputState {
        window_extent: Vec2::new(800.0, 600.0),
        ..Default::default()
    }
}

fn build_tree(root: Rc<RefCell<Node>>) -> ViewTree {
    let mut tree = ViewTree::new();
    let mut events = EventQueue::new();
    tree.build(root, &default_input(), 0, &mut events);
    tree.layout(Vec2::new(800.0, 600.0));
    tree.stack();
    tree.visibility();
    tree.focus_order();
    tree
}

#[test]
fn parents_precede_children_and_child_ranges_are_contiguous() {
    let a = Node::leaf(10.0, 10.0);
    let b = Node::leaf(10.0, 10.0);
    let root = Node::with_children(100.0, 100.0, vec![a, b]);
    let tree = build_tree(root);

    assert!(tree.check_invariants().is_ok());
    assert_eq!(tree.len(), 3);
    let range = tree.children[0];
    assert_eq!(range.span, 2);
    for c in range.iter() {
        assert!(tree.parent[c as usize].unwrap() < c);
    }
}

#[test]
fn hidden_propagates_to_every_descendant() {
    let grandchild = Node::leaf(5.0, 5.0);
    let child = Node::with_children(20.0, 20.0, vec![grandchild]);
    let root = Node::with_children(100.0, 100.0, vec![child.clone()]);
    *child.borrow().hidden.borrow_mut() = true;

    let tree = build_tree(root);
    assert!(tree.check_invariants().is_ok());
    // index 1 is child, index 2 is grandchild (reserved right after).
    assert!(tree.hidden[1]);
    assert!(tree.hidden[2]);
}

#[test]
fn stacking_is_stable_among_equal_layer_and_z_index() {
    let a = Node::leaf(10.0, 10.0);
    let b = Node::leaf(10.0, 10.0);
    let c = Node::leaf(10.0, 10.0);
    let root = Node::with_children(100.0, 100.0, vec![a, b, c]);
    let tree = build_tree(root);

    // All four views share layer 0 / z_idx 0, so a stable sort must leave
    // them in original (depth, insertion) order.
    assert_eq!(tree.z_ord, vec![0, 1, 2, 3]);
}

#[test]
fn bubble_hit_finds_the_nearest_clickable_ancestor() {
    let label = Node::leaf(10.0, 10.0);
    let button = Node::with_children(50.0, 50.0, vec![label]);
    button.borrow_mut().attributes = ViewHitAttributes::CLICKABLE;
    let root = Node::with_children(100.0, 100.0, vec![button]);
    let tree = build_tree(root);

    // The label (index 2) covers the same point as the button (index 1);
    // it is topmost in z order but isn't clickable itself, so the hit
    // must bubble to its parent.
    let hit = tree.hit_index(Vec2::ZERO, ViewHitAttributes::CLICKABLE);
    assert_eq!(hit, Some(1));
}

#[test]
fn bubble_hit_misses_when_no_ancestor_has_the_capability() {
    let label = Node::leaf(10.0, 10.0);
    let root = Node::with_children(100.0, 100.0, vec![label]);
    let tree = build_tree(root);

    let hit = tree.hit_index(Vec2::ZERO, ViewHitAttributes::CLICKABLE);
    assert_eq!(hit, None);
}

#[test]
fn focus_navigation_wraps_cyclically_and_skips_unfocusable_views() {
    let a = Node::leaf(10.0, 10.0);
    let b = Node::leaf(10.0, 10.0);
    let c = Node::leaf(10.0, 10.0);
    a.borrow_mut().focusable = true;
    a.borrow_mut().tab_idx = Some(0);
    b.borrow_mut().focusable = false;
    b.borrow_mut().tab_idx = Some(1);
    c.borrow_mut().focusable = true;
    c.borrow_mut().tab_idx = Some(2);
    let root = Node::with_children(100.0, 100.0, vec![a, b, c]);
    let tree = build_tree(root);

    // From `a` (index 1), forward navigation must skip `b` (unfocusable)
    // and land on `c`.
    let next = crate::focus::navigate_focus(&tree, 1, true);
    assert_eq!(next, 3);

    // And wrapping forward from `c` returns to `a`.
    let wrapped = crate::focus::navigate_focus(&tree, 3, true);
    assert_eq!(wrapped, 1);
}

#[test]
fn dragging_ends_when_escape_is_held() {
    let draggable = Node::leaf(50.0, 50.0);
    draggable.borrow_mut().attributes = ViewHitAttributes::DRAGGABLE;
    let root = Node::with_children(100.0, 100.0, vec![draggable]);
    let tree = build_tree(root);
    let src = tree.ids[1].unwrap();

    let mut events = EventQueue::new();
    let started = HitState::Drag {
        seq: DragSeqState::Start,
        src,
        tgt: None,
    };

    let mut input = default_input();
    input.mouse.focused = true;
    input.mouse.primary.held = true;
    input.keyboard.keys.insert(Key::Escape, KeyState { down: true, held: true, up: false });

    let next = drive_hit_state(&tree, &started, &input, &mut events);
    assert_eq!(next, HitState::None);

    let drained = events.drain(src);
    assert!(drained.events.contains(Events::DRAG_END));
}

#[test]
fn view_ids_are_stable_across_frames_for_the_same_rc() {
    let leaf = Node::leaf(10.0, 10.0);
    let root = Node::with_children(100.0, 100.0, vec![leaf]);

    let mut tree = ViewTree::new();
    let mut events = EventQueue::new();
    tree.build(root.clone(), &default_input(), 0, &mut events);
    let first_id = tree.ids[1];

    tree.build(root, &default_input(), 1, &mut events);
    let second_id = tree.ids[1];

    assert!(first_id.is_some());
    assert_eq!(first_id, second_id);
}

#[test]
fn render_skips_hidden_views_without_panicking() {
    let hidden_child = Node::leaf(10.0, 10.0);
    *hidden_child.borrow().hidden.borrow_mut() = true;
    let visible_child = Node::leaf(10.0, 10.0);
    let root = Node::with_children(100.0, 100.0, vec![hidden_child, visible_child]);
    let mut tree = build_tree(root);

    let mut canvas = NullCanvas;
    tree.render(&mut canvas);
}

#[test]
fn hit_test_with_no_capable_view_under_the_pointer_stays_none() {
    let root = Node::leaf(100.0, 100.0);
    let tree = build_tree(root);
    let mut events = EventQueue::new();

    let mut input = default_input();
    input.mouse.focused = true;
    input.mouse.position = Vec2::ZERO;

    let state = drive_hit_state(&tree, &HitState::None, &input, &mut events);
    assert_eq!(state, HitState::None);
}

#[test]
fn parse_scalar_accepts_an_in_range_value() {
    assert_eq!(parse_scalar::<f32>("3.5", 0.0, 10.0), Some(3.5));
}

#[test]
fn parse_scalar_rejects_out_of_range_and_unparseable_text() {
    assert_eq!(parse_scalar::<f32>("99.0", 0.0, 10.0), None);
    assert_eq!(parse_scalar::<f32>("not-a-number", 0.0, 10.0), None);
    assert_eq!(parse_scalar::<f32>("", 0.0, 10.0), None);
}
