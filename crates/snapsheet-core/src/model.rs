use serde::{Deserialize, Serialize};

/// Length tolerance used by every geometric comparison in the engine.
pub const EPSILON: f64 = 1e-6;

/// Axis-aligned rectangle in page units. `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }
    /// Exclusive right edge (`x + w`).
    pub fn right(&self) -> f64 {
        self.x + self.w
    }
    /// Exclusive bottom edge (`y + h`).
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }
    pub fn area(&self) -> f64 {
        self.w * self.h
    }
    /// True if `w x h` fits inside this rectangle without rotation.
    pub fn fits(&self, w: f64, h: f64) -> bool {
        self.w + EPSILON >= w && self.h + EPSILON >= h
    }
    /// Returns true if `r` is fully inside `self` (edges may coincide).
    pub fn contains(&self, r: &Rect) -> bool {
        r.x + EPSILON >= self.x
            && r.y + EPSILON >= self.y
            && r.right() <= self.right() + EPSILON
            && r.bottom() <= self.bottom() + EPSILON
    }
    /// Open-interval overlap on both axes; rectangles sharing an edge do not intersect.
    pub fn intersects(&self, r: &Rect) -> bool {
        self.x < r.right() - EPSILON
            && r.x < self.right() - EPSILON
            && self.y < r.bottom() - EPSILON
            && r.y < self.bottom() - EPSILON
    }
    /// Grows the rectangle by `d` on every side.
    pub fn expand(&self, d: f64) -> Rect {
        Rect::new(self.x - d, self.y - d, self.w + 2.0 * d, self.h + 2.0 * d)
    }
    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.w, self.h)
    }
}

/// One screenshot to lay out: caller id plus intrinsic pixel size.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item<K = String> {
    pub id: K,
    pub width: f64,
    pub height: f64,
}

impl<K> Item<K> {
    pub fn new(id: K, width: f64, height: f64) -> Self {
        Self { id, width, height }
    }
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Final position of one item, in page coordinates (margin already applied).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlacedItem<K = String> {
    pub id: K,
    /// 0-based page, assigned in page creation order.
    pub page_index: usize,
    pub x: f64,
    pub y: f64,
    /// Footprint on the page; already swapped when `rotated`.
    pub width: f64,
    pub height: f64,
    /// The source image must be turned 90° to fill the footprint.
    pub rotated: bool,
    /// Uniform factor applied by the shrink fallback (`1.0` = requested size).
    pub scale: f64,
}

impl<K> PlacedItem<K> {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Items of one page, in placement order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<K = String> {
    pub index: usize,
    pub width: f64,
    pub height: f64,
    pub items: Vec<PlacedItem<K>>,
}

/// Layout-level metadata, echoed to exporters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    /// Schema version of the exported JSON; current: "1".
    pub schema_version: String,
    pub app: String,
    pub version: String,
    pub unit: String,
    pub page_size: (f64, f64),
    pub margin: f64,
    pub gap: f64,
    pub scale: f64,
    pub allow_rotation: bool,
    pub shrink_tolerance: f64,
}

/// Result of one layout pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layout<K = String> {
    /// Placements in allocation order (not input order).
    pub placements: Vec<PlacedItem<K>>,
    /// Number of pages opened; every index below it holds at least one item.
    pub page_count: usize,
    /// Items that fit no page even when empty, in processing order.
    pub dropped: Vec<K>,
    pub meta: Meta,
}

/// Statistics about page utilisation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PackStats {
    pub num_pages: usize,
    pub num_placed: usize,
    pub num_dropped: usize,
    pub num_rotated: usize,
    /// Items placed by the shrink fallback.
    pub num_shrunk: usize,
    /// Sum of content areas (page minus margins) over all pages.
    pub total_content_area: f64,
    /// Sum of placed footprints.
    pub used_area: f64,
    /// used_area / total_content_area (0.0 to 1.0).
    pub occupancy: f64,
}

impl<K: Clone> Layout<K> {
    /// Placements grouped by page, pages in ascending index order.
    /// This is the shape a document writer consumes.
    pub fn pages(&self) -> Vec<Page<K>> {
        let (width, height) = self.meta.page_size;
        let mut pages: Vec<Page<K>> = (0..self.page_count)
            .map(|index| Page {
                index,
                width,
                height,
                items: Vec::new(),
            })
            .collect();
        for p in &self.placements {
            if let Some(page) = pages.get_mut(p.page_index) {
                page.items.push(p.clone());
            }
        }
        pages
    }
}

impl<K> Layout<K> {
    /// Computes utilisation statistics for this layout.
    pub fn stats(&self) -> PackStats {
        let (pw, ph) = self.meta.page_size;
        let content = (pw - 2.0 * self.meta.margin) * (ph - 2.0 * self.meta.margin);
        let total_content_area = content * self.page_count as f64;
        let mut used_area = 0.0;
        let mut num_rotated = 0;
        let mut num_shrunk = 0;
        for p in &self.placements {
            used_area += p.width * p.height;
            if p.rotated {
                num_rotated += 1;
            }
            if p.scale < 1.0 {
                num_shrunk += 1;
            }
        }
        let occupancy = if total_content_area > 0.0 {
            used_area / total_content_area
        } else {
            0.0
        };
        PackStats {
            num_pages: self.page_count,
            num_placed: self.placements.len(),
            num_dropped: self.dropped.len(),
            num_rotated,
            num_shrunk,
            total_content_area,
            used_area,
            occupancy,
        }
    }
}

impl PackStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Pages: {}, Placed: {}, Dropped: {}, Occupancy: {:.2}%, Content Area: {:.1}, Used Area: {:.1}, Rotated: {}, Shrunk: {}",
            self.num_pages,
            self.num_placed,
            self.num_dropped,
            self.occupancy * 100.0,
            self.total_content_area,
            self.used_area,
            self.num_rotated,
            self.num_shrunk,
        )
    }

    /// Returns unused content area.
    pub fn wasted_area(&self) -> f64 {
        (self.total_content_area - self.used_area).max(0.0)
    }

    /// Returns wasted space as a percentage (0.0 to 100.0).
    pub fn waste_percentage(&self) -> f64 {
        if self.total_content_area > 0.0 {
            self.wasted_area() / self.total_content_area * 100.0
        } else {
            0.0
        }
    }
}
