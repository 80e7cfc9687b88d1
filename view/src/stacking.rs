// Stacking, visibility, and render dispatch (spec.md §4.4).

use support::Rect;

use crate::collab::Canvas;
use crate::tree::ViewTree;

impl ViewTree {
    /// Distributes `z_idx`/`layer` top-down, then derives `z_ord`: a
    /// stable sort by `(layer, z_idx, depth)` (Property C).
    pub fn stack(&mut self) {
        if self.is_empty() {
            return;
        }
        self.z_idx[0] = 0;
        self.layer[0] = 0;

        for i in 0..self.len() {
            let children = self.children[i];
            if children.span == 0 {
                continue;
            }
            let inherited_z = self.z_idx[i];
            let inherited_layer = self.layer[i];
            let mut child_z = vec![inherited_z; children.span as usize];
            let mut child_layer = vec![inherited_layer; children.span as usize];

            {
                let view = self.views[i].borrow();
                view.z_index(inherited_z, &mut child_z);
                view.layer(inherited_layer, &mut child_layer);
            }

            for (k, c) in children.iter().enumerate() {
                self.z_idx[c as usize] = child_z[k];
                self.layer[c as usize] = child_layer[k];
            }
        }

        self.z_ord = (0..self.len() as u32).collect();
        let layer = &self.layer;
        let z_idx = &self.z_idx;
        let depth = &self.depth;
        self.z_ord.sort_by(|&a, &b| {
            let ka = (layer[a as usize], z_idx[a as usize], depth[a as usize]);
            let kb = (layer[b as usize], z_idx[b as usize], depth[b as usize]);
            ka.cmp(&kb)
        });
    }

    /// Propagates `hidden` to descendants (Property E), then culls
    /// whatever falls outside its viewport's clip rectangle.
    pub fn visibility(&mut self) {
        for i in 0..self.len() {
            if self.hidden[i] {
                self.hide_subtree(i);
                continue;
            }
            let own = Rect::new(self.canvas_center[i], self.canvas_extent[i]);
            let parent_clip = match self.viewport[i] {
                Some(vp) => self.clip[vp as usize],
                None => self.clip[0],
            };
            if i != 0 {
                self.hidden[i] = !own.overlaps(&parent_clip);
            }
        }
    }

    fn hide_subtree(&mut self, i: usize) {
        let children = self.children[i];
        for c in children.iter() {
            self.hidden[c as usize] = true;
            self.hide_subtree(c as usize);
        }
    }

    /// Iterates `z_ord`, invoking `render` on every non-hidden view.
    pub fn render(&mut self, canvas: &mut dyn Canvas) {
        let order = self.z_ord.clone();
        for i in order {
            let i = i as usize;
            if self.hidden[i] {
                continue;
            }
            let region = Rect::new(self.center[i], self.extent[i]);
            let canvas_region = Rect::new(self.canvas_center[i], self.canvas_extent[i]);
            let clip = self.clip[i];
            self.views[i].borrow_mut().render(canvas, region, canvas_region, clip);
        }
    }
}
