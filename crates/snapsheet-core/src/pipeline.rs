use crate::config::{PackerConfig, SortOrder};
use crate::error::{Result, SnapSheetError};
use crate::model::{Item, Layout, Meta, PlacedItem};
use crate::packer::maxrects::MaxRectsPage;
use crate::packer::placement::{Placement, PlacementOptions, try_place};
use tracing::{debug, instrument, trace, warn};

/// Ordered set of pages, each with its own free-space tracker.
///
/// Items go to the first existing page that accepts them; a new page is opened
/// only when every existing page refuses. A page is kept only once it holds an item,
/// so page indices stay contiguous.
pub struct PageAllocator {
    content_width: f64,
    content_height: f64,
    opts: PlacementOptions,
    pages: Vec<MaxRectsPage>,
}

impl PageAllocator {
    pub fn new(content_width: f64, content_height: f64, opts: PlacementOptions) -> Self {
        Self {
            content_width,
            content_height,
            opts,
            pages: Vec::new(),
        }
    }

    /// Places a `w x h` box and returns `(page_index, placement)`, or `None` when the
    /// box does not fit even an empty page.
    pub fn allocate(&mut self, w: f64, h: f64) -> Option<(usize, Placement)> {
        for (idx, page) in self.pages.iter_mut().enumerate() {
            if let Some(placement) = try_place(page, w, h, &self.opts) {
                return Some((idx, placement));
            }
        }
        let mut page = MaxRectsPage::new(self.content_width, self.content_height);
        let placement = try_place(&mut page, w, h, &self.opts)?;
        self.pages.push(page);
        let idx = self.pages.len() - 1;
        debug!(page = idx, "opened page");
        Some((idx, placement))
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &[MaxRectsPage] {
        &self.pages
    }
}

/// Print-space size of an item: intrinsic size times `scale`, uniformly reduced so
/// that the item plus gap fits the content area in both dimensions.
///
/// When the content area is not larger than the gap the size is returned unclamped.
pub fn print_size(width: f64, height: f64, cfg: &PackerConfig) -> (f64, f64) {
    let mut w = width * cfg.scale;
    let mut h = height * cfg.scale;
    let max_w = cfg.content_width() - cfg.gap;
    let max_h = cfg.content_height() - cfg.gap;
    if max_w > 0.0 && w > max_w {
        h *= max_w / w;
        w = max_w;
    }
    if max_h > 0.0 && h > max_h {
        w *= max_h / h;
        h = max_h;
    }
    (w, h)
}

fn positive_finite(w: f64, h: f64) -> bool {
    w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0
}

fn validate_items<K>(items: &[Item<K>], cfg: &PackerConfig) -> Result<()> {
    for (idx, it) in items.iter().enumerate() {
        if !positive_finite(it.width, it.height) {
            return Err(SnapSheetError::InvalidInput(format!(
                "item #{} has non-positive size {}x{}",
                idx, it.width, it.height
            )));
        }
        // scaling may overflow to inf or underflow to 0 for finite sizes
        let (pw, ph) = print_size(it.width, it.height, cfg);
        if !positive_finite(it.width * cfg.scale, it.height * cfg.scale)
            || !positive_finite(pw, ph)
        {
            return Err(SnapSheetError::InvalidInput(format!(
                "item #{} size {}x{} has no finite print size at scale {}",
                idx, it.width, it.height, cfg.scale
            )));
        }
    }
    Ok(())
}

/// Processing order as indices into `items`. Stable: ties keep input order.
fn processing_order<K>(items: &[Item<K>], order: &SortOrder) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..items.len()).collect();
    match order {
        SortOrder::None => {}
        SortOrder::AreaDesc => {
            idx.sort_by(|&a, &b| items[b].area().total_cmp(&items[a].area()));
        }
        SortOrder::MaxSideDesc => {
            idx.sort_by(|&a, &b| {
                let sa = items[a].width.max(items[a].height);
                let sb = items[b].width.max(items[b].height);
                sb.total_cmp(&sa)
            });
        }
    }
    idx
}

fn build_meta(cfg: &PackerConfig) -> Meta {
    Meta {
        schema_version: "1".into(),
        app: "snapsheet".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        unit: "mm".into(),
        page_size: (cfg.page_width, cfg.page_height),
        margin: cfg.margin,
        gap: cfg.gap,
        scale: cfg.scale,
        allow_rotation: cfg.allow_rotation,
        shrink_tolerance: cfg.shrink_tolerance,
    }
}

/// Lays out `items` onto as many pages as needed.
///
/// Notes:
/// - The configuration is validated first; invalid values are rejected, not clamped.
/// - Items that fit no page even when empty are reported in `Layout::dropped`.
/// - Output is fully determined by `(items, cfg)`.
#[instrument(skip_all, fields(items = items.len()))]
pub fn pack_items<K: Clone + std::fmt::Debug>(
    items: Vec<Item<K>>,
    cfg: PackerConfig,
) -> Result<Layout<K>> {
    cfg.validate()?;
    validate_items(&items, &cfg)?;

    let opts = PlacementOptions {
        gap: cfg.gap,
        allow_rotation: cfg.allow_rotation,
        shrink_tolerance: cfg.shrink_tolerance,
    };
    let mut allocator = PageAllocator::new(cfg.content_width(), cfg.content_height(), opts);
    let mut placements: Vec<PlacedItem<K>> = Vec::with_capacity(items.len());
    let mut dropped: Vec<K> = Vec::new();

    for idx in processing_order(&items, &cfg.sort_order) {
        let item = &items[idx];
        let (w, h) = print_size(item.width, item.height, &cfg);
        match allocator.allocate(w, h) {
            Some((page_index, placement)) => {
                trace!(
                    input = idx,
                    page = page_index,
                    tier = ?placement.tier,
                    scale = placement.scale,
                    "placed item"
                );
                let r = placement.rect.translate(cfg.margin, cfg.margin);
                placements.push(PlacedItem {
                    id: item.id.clone(),
                    page_index,
                    x: r.x,
                    y: r.y,
                    width: r.w,
                    height: r.h,
                    rotated: placement.rotated,
                    scale: placement.scale,
                });
            }
            None => {
                warn!(
                    id = ?item.id,
                    input = idx,
                    width = w,
                    height = h,
                    gap = cfg.gap,
                    "item does not fit an empty page; dropped"
                );
                dropped.push(item.id.clone());
            }
        }
    }

    debug!(
        pages = allocator.page_count(),
        placed = placements.len(),
        dropped = dropped.len(),
        "layout finished"
    );
    Ok(Layout {
        placements,
        page_count: allocator.page_count(),
        dropped,
        meta: build_meta(&cfg),
    })
}

/// Lays out `(id, width, height)` tuples; convenience over [`pack_items`].
pub fn pack_layout<K: Into<String>>(
    inputs: Vec<(K, f64, f64)>,
    cfg: PackerConfig,
) -> Result<Layout<String>> {
    let items = inputs
        .into_iter()
        .map(|(k, w, h)| Item::new(k.into(), w, h))
        .collect();
    pack_items(items, cfg)
}
