use bitflags::bitflags;
use support::{Rect, Vec2};

use crate::collab::Canvas;
use crate::events::ViewEvents;
use crate::ids::ViewId;
use crate::input::InputState;
use crate::tree::Builder;

bitflags! {
    /// Which pointer/drag capabilities a view opts into. Hit resolution
    /// walks ancestors looking for the nearest view whose attributes match
    /// the requested capability ("bubble hit", spec.md §4.5).
    #[derive(Default)]
    pub struct ViewHitAttributes: u8 {
        const POINTABLE  = 1 << 0;
        const CLICKABLE  = 1 << 1;
        const SCROLLABLE = 1 << 2;
        const DRAGGABLE  = 1 << 3;
        const DROPPABLE  = 1 << 4;
    }
}

/// A text-input-accepting view's declared behavior, used by the focus
/// state machine to decide whether `Tab` should be routed to the view as
/// text or used for focus navigation.
#[derive(Debug, Copy, Clone, Default)]
pub struct TextInputDescriptor {
    pub multiline: bool,
    pub tab_input: bool,
}

/// Returned from [`View::tick`]; everything the core needs to place this
/// view in the tree and route events to it next frame.
#[derive(Debug, Clone, Default)]
pub struct State {
    pub tab_idx: Option<u32>,
    pub input: Option<TextInputDescriptor>,
    pub hidden: bool,
    pub attributes: ViewHitAttributes,
    pub focusable: bool,
    pub viewport: bool,
    pub grab_focus: bool,
    pub defer_close: bool,
    /// Viewport-space absolute positioning override (`fixed[i]`,
    /// `fixed_center[i]` in spec.md §3): when set, this view's canvas
    /// center is this point transformed through its viewport's canvas
    /// transform, bypassing the center its parent's `fit` assigned it.
    pub fixed_center_override: Option<Vec2>,
}

/// Returned from [`View::fit`]. A non-viewport view only ever sets
/// `extent`; the viewport fields are consulted only when `State::viewport`
/// was set during `tick`.
#[derive(Debug, Copy, Clone, Default)]
pub struct Layout {
    pub extent: Vec2,
    pub viewport_extent: Option<Vec2>,
    pub viewport_center: Option<Vec2>,
    pub viewport_zoom: Option<f32>,
    pub fixed_center: Option<Vec2>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum CursorIcon {
    #[default]
    Default,
    Pointer,
    Text,
    Grab,
    NotAllowed,
}

pub struct TickContext<'a> {
    pub input: &'a InputState,
    pub frame_id: u64,
}

/// The two fields every [`View`] impl must store; embed this and forward
/// the four identity/hot accessors to it rather than hand-rolling storage.
#[derive(Debug, Copy, Clone, Default)]
pub struct ViewBase {
    pub id: Option<ViewId>,
    pub hot: bool,
}

/// The capability set every node in the tree implements. Dynamic dispatch
/// over a trait object stands in for the source's v-table-driven
/// polymorphism (spec.md §9).
pub trait View {
    /// The identity token assigned on first mount, `None` until then. The
    /// core writes this once via [`View::set_id`]; every later frame reads
    /// it back to recognize the same logical view (spec.md §3).
    fn id(&self) -> Option<ViewId>;

    fn set_id(&mut self, id: ViewId);

    /// Marks this view eligible for event delivery on the next frame.
    fn hot(&self) -> bool;

    fn set_hot(&mut self, hot: bool);

    /// Called once per frame in depth-first order. `build` accumulates
    /// this view's children; the returned [`State`] places the view in the
    /// tree's bit sets and flag arrays.
    fn tick(&mut self, ctx: &TickContext, events: &ViewEvents, build: &mut Builder) -> State;

    /// Top-down size distribution: propose an extent to each child.
    fn size(&mut self, proposed: Vec2, child_extents: &mut [Vec2]);

    /// Bottom-up fit: given the children's fitted extents and a place to
    /// write their centers, return this view's own fitted layout.
    fn fit(&mut self, proposed: Vec2, child_extents: &[Vec2], child_centers: &mut [Vec2]) -> Layout;

    /// Top-down z-index distribution: assigns each child a stacking
    /// z-index given this view's own (already-resolved) `inherited` value.
    /// The default simply propagates it unchanged.
    fn z_index(&self, inherited: i32, child_z: &mut [i32]) {
        for z in child_z.iter_mut() {
            *z = inherited;
        }
    }

    /// Top-down layer distribution, same shape as [`View::z_index`].
    fn layer(&self, inherited: i32, child_layers: &mut [i32]) {
        for l in child_layers.iter_mut() {
            *l = inherited;
        }
    }

    fn render(&mut self, canvas: &mut dyn Canvas, region: Rect, canvas_region: Rect, clip: Rect);

    fn cursor(&self) -> CursorIcon {
        CursorIcon::Default
    }
}
