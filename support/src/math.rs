// 2D math primitives shared by the view tree, layout, and GPU coordinator.
//
// Kept deliberately small: the view system never needs anything beyond
// 2D similarity transforms (translate + per-axis scale, no rotation/shear),
// so `Affine2` only implements the closed-form composition and inverse the
// layout pass actually performs instead of a general 3x3 matrix inverse.

use std::ops::{Add, Div, Mul, Sub};

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn splat(v: f32) -> Self {
        Self { x: v, y: v }
    }

    pub fn min(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x.min(other.x), self.y.min(other.y))
    }

    pub fn max(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x.max(other.x), self.y.max(other.y))
    }

    pub fn clamp(self, lo: Vec2, hi: Vec2) -> Vec2 {
        Vec2::new(self.x.clamp(lo.x, hi.x), self.y.clamp(lo.y, hi.y))
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Mul<Vec2> for Vec2 {
    type Output = Vec2;
    /// Component-wise multiplication, used for per-axis zoom.
    fn mul(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x * rhs.x, self.y * rhs.y)
    }
}

impl Div<Vec2> for Vec2 {
    type Output = Vec2;
    fn div(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x / rhs.x, self.y / rhs.y)
    }
}

/// A canvas-space axis-aligned rectangle expressed as center + extent,
/// matching the `{center[i], extent[i]}` pairs the view tree arrays carry.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Rect {
    pub center: Vec2,
    pub extent: Vec2,
}

impl Rect {
    pub fn new(center: Vec2, extent: Vec2) -> Self {
        Self { center, extent }
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.extent * 0.5
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.extent * 0.5
    }

    pub fn contains(&self, p: Vec2) -> bool {
        let mn = self.min();
        let mx = self.max();
        p.x >= mn.x && p.x <= mx.x && p.y >= mn.y && p.y <= mx.y
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        let a_min = self.min();
        let a_max = self.max();
        let b_min = other.min();
        let b_max = other.max();
        a_min.x <= b_max.x && a_max.x >= b_min.x && a_min.y <= b_max.y && a_max.y >= b_min.y
    }

    /// Intersection of two rectangles. If they don't overlap, the result is
    /// degenerate (non-positive extent) rather than panicking: the layout
    /// pass is expected to still be able to store it and let the visibility
    /// pass cull it via `overlaps`.
    pub fn intersect(&self, other: &Rect) -> Rect {
        let a_min = self.min();
        let a_max = self.max();
        let b_min = other.min();
        let b_max = other.max();

        let mn = a_min.max(b_min);
        let mx = a_max.min(b_max);
        let extent = (mx - mn).max(Vec2::ZERO);
        let center = mn + extent * 0.5;
        Rect::new(center, extent)
    }
}

/// A 2D similarity transform: a per-axis scale followed by a translation.
///
/// The view system only ever composes `translate(t2) * scale(s) * translate(-t1)`
/// chains (viewport transforms), so this is kept as `scale`+`translate` rather
/// than a general 3x3 matrix — simpler, and the closed-form inverse spec.md
/// calls for falls out directly.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Affine2 {
    pub scale: Vec2,
    pub translate: Vec2,
}

impl Affine2 {
    pub fn identity() -> Self {
        Self {
            scale: Vec2::splat(1.0),
            translate: Vec2::ZERO,
        }
    }

    pub fn from_translate_scale_translate(post: Vec2, scale: Vec2, pre: Vec2) -> Self {
        // y = scale * (p - pre) + post = scale*p + (post - scale*pre)
        Self {
            scale,
            translate: post - scale * pre,
        }
    }

    pub fn apply(&self, p: Vec2) -> Vec2 {
        self.scale * p + self.translate
    }

    /// Composes `self` with `rhs`, i.e. applies `rhs` first then `self`:
    /// `(self * rhs).apply(p) == self.apply(rhs.apply(p))`.
    pub fn compose(&self, rhs: &Affine2) -> Affine2 {
        Affine2 {
            scale: self.scale * rhs.scale,
            translate: self.scale * rhs.translate + self.translate,
        }
    }

    /// Closed-form inverse of a translate-scale-translate similarity.
    pub fn inverse(&self) -> Affine2 {
        let inv_scale = Vec2::new(1.0 / self.scale.x, 1.0 / self.scale.y);
        Affine2 {
            scale: inv_scale,
            translate: inv_scale * (self.translate * -1.0),
        }
    }

    /// The transform's uniform-axis zoom factor as used by the layout pass
    /// (`transform[0][0]` in the original matrix formulation).
    pub fn zoom(&self) -> f32 {
        self.scale.x
    }
}
