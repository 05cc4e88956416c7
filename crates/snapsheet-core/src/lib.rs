//! Core layout engine for packing screenshots onto printable pages.
//!
//! - Free-space tracking: MaxRects pool per page, Best-Short-Side-Fit scoring
//! - Placement: strict upright, then rotated (optional), then bounded shrink-to-fit
//! - Pipeline: `pack_items` sizes, orders and allocates items across as many pages as needed
//! - Data model is serde-serializable; JSON exporters are provided in `export`.
//!
//! Quick example:
//! ```
//! use snapsheet_core::{PackerConfig, pack_layout};
//! # fn main() -> snapsheet_core::Result<()> {
//! let cfg = PackerConfig::builder().margin(10.0).gap(5.0).scale(0.1).build();
//! let layout = pack_layout(vec![("a", 1000.0, 2000.0), ("b", 1920.0, 1080.0)], cfg)?;
//! for page in layout.pages() {
//!     println!("page {}: {} items", page.index, page.items.len());
//! }
//! # Ok(()) }
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod packer;
pub mod pipeline;

pub use config::*;
pub use error::*;
pub use export::*;
pub use model::*;
pub use packer::*;
pub use pipeline::*;

/// Convenience prelude for common types and functions.
/// Importing `snapsheet_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{
        PackerConfig, PackerConfigBuilder, PageOrientation, PageSize, SortOrder,
    };
    pub use crate::model::{Item, Layout, Meta, PackStats, Page, PlacedItem, Rect};
    pub use crate::packer::FreeSpace;
    pub use crate::packer::maxrects::MaxRectsPage;
    pub use crate::packer::placement::{Placement, PlacementOptions, Tier, try_place};
    pub use crate::{pack_items, pack_layout, print_size, to_json_hash, to_json_pages};
}
