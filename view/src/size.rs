/// A single-axis adaptive size: the only primitive through which a view
/// may size itself relative to the extent its parent proposes. Children
/// receive their size purely by composing `Size`s, never by reading
/// absolute pixels out of band.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Size {
    pub offset: f32,
    pub scale: f32,
    pub rmin: f32,
    pub rmax: f32,
    pub min: f32,
    pub max: f32,
}

impl Default for Size {
    fn default() -> Self {
        Self {
            offset: 0.0,
            scale: 0.0,
            rmin: 0.0,
            rmax: 1.0,
            min: 0.0,
            max: f32::INFINITY,
        }
    }
}

impl Size {
    pub fn fixed(px: f32) -> Self {
        Self {
            offset: px,
            ..Default::default()
        }
    }

    pub fn relative(scale: f32) -> Self {
        Self {
            scale,
            ..Default::default()
        }
    }

    /// Resolves a proposed input `v` to a concrete extent along this axis.
    pub fn resolve(&self, v: f32) -> f32 {
        let raw = self.offset + v * self.scale;
        let ratio_clamped = raw.clamp(self.rmin * v, self.rmax * v);
        ratio_clamped.clamp(self.min, self.max)
    }
}

/// An independent [`Size`] per axis.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Frame {
    pub width: Size,
    pub height: Size,
}

impl Frame {
    pub fn new(width: Size, height: Size) -> Self {
        Self { width, height }
    }

    pub fn resolve(&self, proposed: support::Vec2) -> support::Vec2 {
        support::Vec2::new(self.width.resolve(proposed.x), self.height.resolve(proposed.y))
    }
}
