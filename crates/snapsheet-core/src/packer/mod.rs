use crate::model::Rect;

pub mod maxrects;
pub mod placement;

/// Free-space bookkeeping for a single page.
///
/// Implementations keep a pool of free rectangles that never overlap a committed box.
/// `find_position` may return `None` when no free rectangle can hold the box.
pub trait FreeSpace {
    /// Best spot for a `w x h` box, or `None` if no free region is large enough.
    fn find_position(&self, w: f64, h: f64) -> Option<Rect>;
    /// Carves `node` out of the free pool.
    fn commit(&mut self, node: &Rect);
    /// Current free regions, in pool order.
    fn free_rects(&self) -> &[Rect];
}
