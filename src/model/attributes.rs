use serde::{Deserialize, Serialize};

/// Which per-box attributes a shapes layer carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PropertySchema {
    /// Display id plus a scroll-axis sub-range, for targets with more than two axes.
    #[default]
    Tracked,
    /// Display id only. A pure 2D target has no axis to scroll along.
    IdOnly,
}

impl PropertySchema {
    pub fn for_ndim(ndim: usize) -> Self {
        if ndim > 2 { Self::Tracked } else { Self::IdOnly }
    }

    pub fn tracks_axis(self) -> bool {
        matches!(self, Self::Tracked)
    }
}

/// Derived attributes of one box, index-aligned with the box geometry.
///
/// `None` means "unset"; readers substitute the axis default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RoiAttributes {
    pub id: String,
    pub track_axis: Option<usize>,
    pub scroll_start: Option<f64>,
    pub scroll_end: Option<f64>,
}

impl RoiAttributes {
    pub fn unset() -> Self {
        Self::default()
    }

    /// Start and end ordered so that the first value is never larger.
    pub fn ordered_range(start: f64, end: f64) -> (f64, f64) {
        (start.min(end), start.max(end))
    }
}
