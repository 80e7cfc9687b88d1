//! The retained-mode view tree: a flattened, per-frame-rebuilt scene graph
//! with adaptive sizing, stacking, clip-based culling, pointer/drag hit
//! resolution, and keyboard focus navigation. Rendering and text shaping
//! are out of scope here and are modeled only as the [`collab`] traits a
//! host composes this crate with.

pub mod collab;
pub mod error;
pub mod events;
pub mod focus;
pub mod hit;
pub mod ids;
pub mod input;
pub mod layout;
pub mod scalar;
pub mod size;
pub mod stacking;
pub mod system;
pub mod tree;
pub mod view;

#[cfg(test)]
mod tests;

pub use collab::{Canvas, Clipboard, TextLayout, TextShaper, Theme};
pub use error::ViewTreeError;
pub use events::{Events, EventQueue, HitInfo, ScrollInfo, ViewEvents};
pub use focus::{navigate_focus, drive_focus_state, FocusState};
pub use hit::{drive_hit_state, DragSeqState, HitState};
pub use ids::{IdAllocator, ViewId};
pub use input::{
    ButtonState, DropPhase, DropState, Key, KeyState, KeyboardState, Modifiers, MouseState,
    InputState,
};
pub use scalar::parse_scalar;
pub use size::{Frame, Size};
pub use system::{run, ViewSystem};
pub use tree::{Builder, ChildRange, ViewTree};
pub use view::{CursorIcon, Layout, State, TextInputDescriptor, TickContext, View, ViewBase, ViewHitAttributes};
