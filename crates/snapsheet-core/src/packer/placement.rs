//! Per-page placement policy.
//!
//! A box is reserved as `(w + gap) x (h + gap)` so that the clearance lands on the
//! right and bottom of every item; the visible box keeps the requested size.
//! Tiers, in order:
//! 1. strict upright fit (Best-Short-Side-Fit via [`FreeSpace::find_position`])
//! 2. strict rotated fit, when rotation is allowed
//! 3. bounded shrink: the free region admitting the largest uniform scale
//!    `>= 1 - shrink_tolerance` wins; upright beats rotated on equal scale,
//!    then the earlier region in pool order.

use super::FreeSpace;
use crate::model::{EPSILON, Rect};

/// Placement preferences shared by every item of one layout pass.
#[derive(Debug, Clone, Copy)]
pub struct PlacementOptions {
    pub gap: f64,
    pub allow_rotation: bool,
    pub shrink_tolerance: f64,
}

/// Which tier produced a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Upright,
    Rotated,
    Shrunk,
}

/// Visible box chosen for one item, relative to the tracker's origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub rect: Rect,
    pub rotated: bool,
    /// `1.0` unless the shrink tier was used.
    pub scale: f64,
    pub tier: Tier,
}

#[derive(Debug, Clone, Copy)]
struct ShrinkCandidate {
    region: Rect,
    scale: f64,
    rotated: bool,
}

/// Places a `w x h` box on `page`, committing the reserved area on success.
/// Returns `None` (page untouched) when no tier succeeds.
pub fn try_place<P: FreeSpace + ?Sized>(
    page: &mut P,
    w: f64,
    h: f64,
    opts: &PlacementOptions,
) -> Option<Placement> {
    let gap = opts.gap;

    if let Some(slot) = page.find_position(w + gap, h + gap) {
        page.commit(&slot);
        return Some(Placement {
            rect: Rect::new(slot.x, slot.y, w, h),
            rotated: false,
            scale: 1.0,
            tier: Tier::Upright,
        });
    }

    if opts.allow_rotation {
        if let Some(slot) = page.find_position(h + gap, w + gap) {
            page.commit(&slot);
            return Some(Placement {
                rect: Rect::new(slot.x, slot.y, h, w),
                rotated: true,
                scale: 1.0,
                tier: Tier::Rotated,
            });
        }
    }

    if opts.shrink_tolerance > 0.0 {
        let best = best_shrink_candidate(page.free_rects(), w, h, opts)?;
        let (tw, th) = if best.rotated { (h, w) } else { (w, h) };
        let sw = tw * best.scale;
        let sh = th * best.scale;
        let slot = Rect::new(best.region.x, best.region.y, sw + gap, sh + gap);
        page.commit(&slot);
        return Some(Placement {
            rect: Rect::new(slot.x, slot.y, sw, sh),
            rotated: best.rotated,
            scale: best.scale,
            tier: Tier::Shrunk,
        });
    }

    None
}

/// Largest scale `<= 1` at which `w x h` plus gap fits `region`, if any room remains.
fn fit_scale(region: &Rect, w: f64, h: f64, gap: f64) -> Option<f64> {
    let max_w = region.w - gap;
    let max_h = region.h - gap;
    if max_w <= 0.0 || max_h <= 0.0 {
        return None;
    }
    Some((max_w / w).min(max_h / h).min(1.0))
}

fn best_shrink_candidate(
    free: &[Rect],
    w: f64,
    h: f64,
    opts: &PlacementOptions,
) -> Option<ShrinkCandidate> {
    // EPSILON of length slack on the longest side, as in `Rect::fits`
    let floor = 1.0 - opts.shrink_tolerance - EPSILON / w.max(h);
    let mut best: Option<ShrinkCandidate> = None;
    let mut consider = |cand: ShrinkCandidate| {
        let better = match &best {
            None => true,
            Some(b) => cand.scale > b.scale || (cand.scale == b.scale && b.rotated && !cand.rotated),
        };
        if better {
            best = Some(cand);
        }
    };
    for region in free {
        if let Some(scale) = fit_scale(region, w, h, opts.gap).filter(|s| *s >= floor) {
            consider(ShrinkCandidate {
                region: *region,
                scale,
                rotated: false,
            });
        }
        if opts.allow_rotation {
            if let Some(scale) = fit_scale(region, h, w, opts.gap).filter(|s| *s >= floor) {
                consider(ShrinkCandidate {
                    region: *region,
                    scale,
                    rotated: true,
                });
            }
        }
    }
    best
}
