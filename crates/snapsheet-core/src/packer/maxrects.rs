use super::FreeSpace;
use crate::model::{EPSILON, Rect};

/// MaxRects free-rectangle pool for one page, scored with Best-Short-Side-Fit.
///
/// Coordinates are relative to the page's content area (origin at the margin).
/// Free rectangles may overlap each other; none overlaps a committed box.
#[derive(Debug, Clone)]
pub struct MaxRectsPage {
    bounds: Rect,
    free: Vec<Rect>,
}

impl MaxRectsPage {
    pub fn new(width: f64, height: f64) -> Self {
        let bounds = Rect::new(0.0, 0.0, width, height);
        Self {
            bounds,
            free: vec![bounds],
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn free_list_len(&self) -> usize {
        self.free.len()
    }

    /// `(short_side_leftover, long_side_leftover)`; lower is better.
    fn score(fr: &Rect, w: f64, h: f64) -> (f64, f64) {
        let leftover_h = (fr.w - w).abs();
        let leftover_v = (fr.h - h).abs();
        (leftover_h.min(leftover_v), leftover_h.max(leftover_v))
    }

    fn place_rect(&mut self, node: &Rect) {
        // rebuilt from scratch: split every free rectangle that intersects node
        let mut new_free: Vec<Rect> = Vec::with_capacity(self.free.len() + 4);
        for fr in self.free.iter() {
            if !fr.intersects(node) {
                new_free.push(*fr);
                continue;
            }
            let fr_x2 = fr.right();
            let fr_y2 = fr.bottom();
            let n_x2 = node.right();
            let n_y2 = node.bottom();

            // above
            if node.y > fr.y + EPSILON {
                new_free.push(Rect::new(fr.x, fr.y, fr.w, node.y - fr.y));
            }
            // below
            if n_y2 < fr_y2 - EPSILON {
                new_free.push(Rect::new(fr.x, n_y2, fr.w, fr_y2 - n_y2));
            }
            // left
            if node.x > fr.x + EPSILON {
                new_free.push(Rect::new(fr.x, fr.y, node.x - fr.x, fr.h));
            }
            // right
            if n_x2 < fr_x2 - EPSILON {
                new_free.push(Rect::new(n_x2, fr.y, fr_x2 - n_x2, fr.h));
            }
        }

        self.free = new_free;
        self.prune_free_list();
    }

    /// Drops every free rectangle contained in another one, keeping pool order.
    fn prune_free_list(&mut self) {
        let mut i = 0;
        while i < self.free.len() {
            let mut j = i + 1;
            let a = self.free[i];
            let mut remove_i = false;
            while j < self.free.len() {
                let b = self.free[j];
                if b.contains(&a) {
                    remove_i = true;
                    break;
                }
                if a.contains(&b) {
                    self.free.remove(j);
                    continue;
                }
                j += 1;
            }
            if remove_i {
                self.free.remove(i);
            } else {
                i += 1;
            }
        }
    }
}

impl FreeSpace for MaxRectsPage {
    fn find_position(&self, w: f64, h: f64) -> Option<Rect> {
        let mut best: Option<(Rect, f64, f64)> = None;
        for fr in &self.free {
            if !fr.fits(w, h) {
                continue;
            }
            let (short_fit, long_fit) = Self::score(fr, w, h);
            // strict comparison: the earliest region in pool order wins exact ties
            let better = match best {
                None => true,
                Some((_, best_short, best_long)) => {
                    short_fit < best_short || (short_fit == best_short && long_fit < best_long)
                }
            };
            if better {
                best = Some((Rect::new(fr.x, fr.y, w, h), short_fit, long_fit));
            }
        }
        best.map(|(r, _, _)| r)
    }

    fn commit(&mut self, node: &Rect) {
        self.place_rect(node);
    }

    fn free_rects(&self) -> &[Rect] {
        &self.free
    }
}
