// Out-of-scope collaborators, specified only at the interface seam
// (spec.md §6). The view crate never implements these: font shaping,
// canvas recording, and the process-wide theme all live outside the core.

use support::{Rect, Vec2};

pub type Color = [f32; 4];

/// Which side of a codepoint boundary a caret sits on. Duplicated locally
/// rather than depending on the `text` crate: input-box widgets that glue
/// the two together are out of scope here (spec.md §1).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CaretAlignment {
    Left,
    Right,
}

/// Records primitive shape instances against clip rectangles. The tree
/// calls these during the render pass (spec.md §4.4); nothing more is
/// assumed of the implementation.
pub trait Canvas {
    fn rrect(&mut self, region: Rect, clip: Rect, radius: f32, color: Color);
    fn brect(&mut self, region: Rect, clip: Rect, color: Color);
    fn squircle(&mut self, region: Rect, clip: Rect, color: Color);
    fn circle(&mut self, region: Rect, clip: Rect, color: Color);
    fn image(&mut self, region: Rect, clip: Rect, texture: u16);
}

/// A laid-out block of shaped text ready to be rendered and hit-tested.
/// Produced by a [`TextShaper`]; the core never rasterizes glyphs itself.
pub trait TextLayout {
    fn extent(&self) -> Vec2;

    fn render(
        &self,
        canvas: &mut dyn Canvas,
        transform: support::Affine2,
        clip: Rect,
        highlights: &[Rect],
        carets: &[(Vec2, CaretAlignment)],
    );

    fn hit(&self, pos: Vec2) -> (i64, CaretAlignment);
}

/// Shapes a run of text against a maximum width. Out of scope to
/// implement here (spec.md §1): glyph rasterization and atlas packing
/// live behind this seam.
pub trait TextShaper {
    fn layout_text(&self, block: &str, max_width: f32) -> Box<dyn TextLayout>;
}

/// The OS clipboard, reachable only from `Cut`/`Copy`/`Paste` handlers.
pub trait Clipboard {
    fn get(&mut self) -> Vec<u8>;
    fn set(&mut self, bytes: &[u8]);
}

/// Process-wide, read-mostly appearance state. One shared instance is
/// initialized at engine start; mutation during a frame is observed on
/// the next frame (spec.md §6).
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub surface: Color,
    pub primary: Color,
    pub error: Color,
    pub warning: Color,
    pub success: Color,
    pub active: Color,
    pub inactive: Color,
    pub on_background: Color,
    pub on_surface: Color,
    pub on_primary: Color,
    pub focus: Color,
    pub highlight: Color,
    pub caret: Color,
    pub head_font: String,
    pub body_font: String,
    pub icon_font: String,
    pub font_size: f32,
    pub line_height: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: [0.0, 0.0, 0.0, 1.0],
            surface: [0.1, 0.1, 0.1, 1.0],
            primary: [0.2, 0.4, 0.9, 1.0],
            error: [0.8, 0.1, 0.1, 1.0],
            warning: [0.9, 0.6, 0.1, 1.0],
            success: [0.1, 0.7, 0.3, 1.0],
            active: [0.3, 0.5, 1.0, 1.0],
            inactive: [0.5, 0.5, 0.5, 1.0],
            on_background: [1.0, 1.0, 1.0, 1.0],
            on_surface: [1.0, 1.0, 1.0, 1.0],
            on_primary: [1.0, 1.0, 1.0, 1.0],
            focus: [1.0, 0.8, 0.2, 1.0],
            highlight: [0.3, 0.5, 1.0, 0.35],
            caret: [1.0, 1.0, 1.0, 1.0],
            head_font: "sans-serif".to_string(),
            body_font: "sans-serif".to_string(),
            icon_font: "icons".to_string(),
            font_size: 14.0,
            line_height: 1.3,
        }
    }
}
