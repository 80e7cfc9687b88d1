// The three-phase layout pass (spec.md §4.3): top-down size proposal,
// bottom-up fit, then coordinate composition through viewport transforms.

use support::{Affine2, Rect, Vec2};

use crate::tree::ViewTree;

impl ViewTree {
    /// Runs all three layout phases against a root proposal of
    /// `viewport_extent` (typically the window's current extent).
    pub fn layout(&mut self, viewport_extent: Vec2) {
        if self.is_empty() {
            return;
        }
        self.size_distribution(viewport_extent);
        self.bottom_up_fit();
        self.compose_coordinates(viewport_extent);
    }

    fn size_distribution(&mut self, viewport_extent: Vec2) {
        self.extent[0] = viewport_extent;
        for i in 0..self.len() {
            let children = self.children[i];
            if children.span == 0 {
                continue;
            }
            let proposed = self.extent[i];
            let mut child_extents = vec![Vec2::ZERO; children.span as usize];
            self.views[i].borrow_mut().size(proposed, &mut child_extents);
            for (k, c) in children.iter().enumerate() {
                self.extent[c as usize] = child_extents[k];
            }
        }
    }

    fn bottom_up_fit(&mut self) {
        for i in (0..self.len()).rev() {
            let children = self.children[i];
            let proposed = self.extent[i];
            let child_extents: Vec<Vec2> = children.iter().map(|c| self.extent[c as usize]).collect();
            let mut child_centers = vec![Vec2::ZERO; children.span as usize];

            let fitted = self.views[i].borrow_mut().fit(proposed, &child_extents, &mut child_centers);

            for (k, c) in children.iter().enumerate() {
                self.center[c as usize] = child_centers[k];
            }
            self.extent[i] = fitted.extent;
            if self.is_viewport[i] {
                self.viewport_extent[i] = fitted.viewport_extent;
                self.viewport_center[i] = fitted.viewport_center;
                self.viewport_zoom[i] = fitted.viewport_zoom;
                self.fixed_center[i] = fitted.fixed_center;
            }
        }
    }

    fn compose_coordinates(&mut self, viewport_extent: Vec2) {
        self.canvas_xfm[0] = Affine2::identity();
        self.canvas_inv_xfm[0] = Affine2::identity();
        self.clip[0] = Rect::new(Vec2::ZERO, viewport_extent);

        for i in 1..self.len() {
            if self.is_viewport[i] {
                let parent_xfm = match self.viewport[i] {
                    Some(vp) => self.canvas_xfm[vp as usize],
                    None => Affine2::identity(),
                };
                let post = self.fixed_center[i].unwrap_or(Vec2::ZERO);
                let zoom = self.viewport_zoom[i].unwrap_or(1.0);
                let pre = self.viewport_center[i].unwrap_or(Vec2::ZERO);
                let local = Affine2::from_translate_scale_translate(post, Vec2::splat(zoom), pre);
                self.canvas_xfm[i] = parent_xfm.compose(&local);
                self.canvas_inv_xfm[i] = self.canvas_xfm[i].inverse();
            } else if let Some(vp) = self.viewport[i] {
                self.canvas_xfm[i] = self.canvas_xfm[vp as usize];
                self.canvas_inv_xfm[i] = self.canvas_inv_xfm[vp as usize];
            } else {
                self.canvas_xfm[i] = Affine2::identity();
                self.canvas_inv_xfm[i] = Affine2::identity();
            }
        }

        for i in 0..self.len() {
            let xfm = match self.viewport[i] {
                Some(vp) => self.canvas_xfm[vp as usize],
                None => self.canvas_xfm[i],
            };
            let local_center = self.fixed_override[i].unwrap_or(self.center[i]);
            self.canvas_center[i] = xfm.apply(local_center);
            self.canvas_extent[i] = self.extent[i] * Vec2::splat(xfm.zoom());
        }

        self.clip[0] = Rect::new(Vec2::ZERO, viewport_extent);
        for i in 1..self.len() {
            if self.is_viewport[i] {
                let parent_clip = match self.viewport[i] {
                    Some(vp) => self.clip[vp as usize],
                    None => self.clip[0],
                };
                let own = Rect::new(self.canvas_center[i], self.canvas_extent[i]);
                self.clip[i] = own.intersect(&parent_clip);
            } else if let Some(vp) = self.viewport[i] {
                self.clip[i] = self.clip[vp as usize];
            } else {
                self.clip[i] = self.clip[0];
            }
        }
    }
}
