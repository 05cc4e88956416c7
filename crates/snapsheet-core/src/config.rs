use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Page formats with dimensions in millimetres (portrait).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    A3,
    A4,
    A5,
    Letter,
    Legal,
    Custom { width: f64, height: f64 },
}

impl PageSize {
    /// Portrait `(width, height)` in millimetres.
    pub fn dimensions(&self) -> (f64, f64) {
        match *self {
            PageSize::A3 => (297.0, 420.0),
            PageSize::A4 => (210.0, 297.0),
            PageSize::A5 => (148.0, 210.0),
            PageSize::Letter => (215.9, 279.4),
            PageSize::Legal => (215.9, 355.6),
            PageSize::Custom { width, height } => (width, height),
        }
    }

    /// Dimensions in the requested orientation.
    pub fn oriented(&self, orientation: PageOrientation) -> (f64, f64) {
        let (w, h) = self.dimensions();
        let (short, long) = if w <= h { (w, h) } else { (h, w) };
        match orientation {
            PageOrientation::Portrait => (short, long),
            PageOrientation::Landscape => (long, short),
        }
    }
}

impl FromStr for PageSize {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "a3" => Ok(Self::A3),
            "a4" => Ok(Self::A4),
            "a5" => Ok(Self::A5),
            "letter" => Ok(Self::Letter),
            "legal" => Ok(Self::Legal),
            other => {
                // "WIDTHxHEIGHT" in millimetres, e.g. "100x150"
                let (w, h) = other.split_once('x').ok_or(())?;
                let width = w.trim().parse::<f64>().map_err(|_| ())?;
                let height = h.trim().parse::<f64>().map_err(|_| ())?;
                Ok(Self::Custom { width, height })
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PageOrientation {
    Portrait,
    Landscape,
}

impl FromStr for PageOrientation {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "portrait" => Ok(Self::Portrait),
            "landscape" => Ok(Self::Landscape),
            _ => Err(()),
        }
    }
}

/// Order in which items are handed to the page allocator.
/// All orders are stable: ties keep the caller's input order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Descending intrinsic area (largest screenshots first).
    AreaDesc,
    /// Descending longest intrinsic side.
    MaxSideDesc,
    /// Caller order, e.g. a manual arrangement from the editor.
    None,
}

impl FromStr for SortOrder {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "area_desc" => Ok(Self::AreaDesc),
            "max_side_desc" => Ok(Self::MaxSideDesc),
            "none" => Ok(Self::None),
            _ => Err(()),
        }
    }
}

/// Page geometry and placement preferences. All lengths share one unit
/// (millimetres for printable output).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackerConfig {
    /// Full page width, margins included.
    pub page_width: f64,
    /// Full page height, margins included.
    pub page_height: f64,
    /// Blank border on every side of the page.
    pub margin: f64,
    /// Minimum clearance between two placed items.
    pub gap: f64,
    /// Allow 90° rotation when the upright orientation does not fit.
    pub allow_rotation: bool,
    /// Intrinsic pixels to page units (0.1 => 1920px becomes 192mm).
    pub scale: f64,
    /// Largest fractional size reduction accepted when nothing fits at full size.
    /// `0.0` disables shrinking.
    #[serde(default)]
    pub shrink_tolerance: f64,
    #[serde(default = "default_sort_order")]
    pub sort_order: SortOrder,
}

impl Default for PackerConfig {
    fn default() -> Self {
        let (page_width, page_height) = PageSize::A4.dimensions();
        Self {
            page_width,
            page_height,
            margin: 10.0,
            gap: 5.0,
            allow_rotation: false,
            scale: 0.1,
            shrink_tolerance: 0.0,
            sort_order: default_sort_order(),
        }
    }
}

impl PackerConfig {
    /// Validates the configuration parameters.
    ///
    /// Invalid values are rejected, never clamped. Returns an error if:
    /// - page dimensions are not positive finite numbers
    /// - the margin is negative or consumes a whole page dimension
    /// - the gap is negative, the scale is not positive, or the shrink
    ///   tolerance lies outside `[0, 1]`
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::SnapSheetError;

        if !(self.page_width.is_finite() && self.page_height.is_finite())
            || self.page_width <= 0.0
            || self.page_height <= 0.0
        {
            return Err(SnapSheetError::InvalidDimensions {
                width: self.page_width,
                height: self.page_height,
            });
        }

        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(SnapSheetError::InvalidConfig(format!(
                "margin must be a non-negative number, got {}",
                self.margin
            )));
        }
        let total_margin = self.margin * 2.0;
        if total_margin >= self.page_width || total_margin >= self.page_height {
            return Err(SnapSheetError::InvalidConfig(format!(
                "margin ({}) * 2 leaves no content area on a {}x{} page",
                self.margin, self.page_width, self.page_height
            )));
        }

        if !self.gap.is_finite() || self.gap < 0.0 {
            return Err(SnapSheetError::InvalidConfig(format!(
                "gap must be a non-negative number, got {}",
                self.gap
            )));
        }

        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(SnapSheetError::InvalidConfig(format!(
                "scale must be a positive number, got {}",
                self.scale
            )));
        }

        if !self.shrink_tolerance.is_finite() || !(0.0..=1.0).contains(&self.shrink_tolerance) {
            return Err(SnapSheetError::InvalidConfig(format!(
                "shrink_tolerance must lie in [0, 1], got {}",
                self.shrink_tolerance
            )));
        }

        Ok(())
    }

    /// Width of the page minus the margin on both sides.
    pub fn content_width(&self) -> f64 {
        self.page_width - self.margin * 2.0
    }

    /// Height of the page minus the margin on both sides.
    pub fn content_height(&self) -> f64 {
        self.page_height - self.margin * 2.0
    }
}

fn default_sort_order() -> SortOrder {
    SortOrder::AreaDesc
}

/// Builder for `PackerConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct PackerConfigBuilder {
    cfg: PackerConfig,
}

impl PackerConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: PackerConfig::default(),
        }
    }
    pub fn page_size(mut self, size: PageSize, orientation: PageOrientation) -> Self {
        let (w, h) = size.oriented(orientation);
        self.cfg.page_width = w;
        self.cfg.page_height = h;
        self
    }
    pub fn with_page_dimensions(mut self, w: f64, h: f64) -> Self {
        self.cfg.page_width = w;
        self.cfg.page_height = h;
        self
    }
    pub fn margin(mut self, v: f64) -> Self {
        self.cfg.margin = v;
        self
    }
    pub fn gap(mut self, v: f64) -> Self {
        self.cfg.gap = v;
        self
    }
    pub fn allow_rotation(mut self, v: bool) -> Self {
        self.cfg.allow_rotation = v;
        self
    }
    pub fn scale(mut self, v: f64) -> Self {
        self.cfg.scale = v;
        self
    }
    pub fn shrink_tolerance(mut self, v: f64) -> Self {
        self.cfg.shrink_tolerance = v;
        self
    }
    pub fn sort_order(mut self, v: SortOrder) -> Self {
        self.cfg.sort_order = v;
        self
    }
    pub fn build(self) -> PackerConfig {
        self.cfg
    }
}

impl PackerConfig {
    /// Create a fluent builder for `PackerConfig`.
    pub fn builder() -> PackerConfigBuilder {
        PackerConfigBuilder::new()
    }
}
