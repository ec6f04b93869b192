use serde::{Deserialize, Serialize};

/// Name of an axis in display order. The three trailing axes of an image are
/// `Z`, `Y`, `X`; anything in front of them keeps its positional index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisKind {
    Z,
    Y,
    X,
    Indexed(usize),
}

impl AxisKind {
    pub fn for_index(index: usize, ndim: usize) -> Self {
        match ndim.saturating_sub(index) {
            1 => Self::X,
            2 => Self::Y,
            3 => Self::Z,
            _ => Self::Indexed(index),
        }
    }

    /// Label shown in ROI summaries, e.g. `Z` or `axis 0`.
    pub fn label(self) -> String {
        match self {
            Self::Z => "Z".to_string(),
            Self::Y => "Y".to_string(),
            Self::X => "X".to_string(),
            Self::Indexed(index) => format!("axis {index}"),
        }
    }

    /// Prefix for CSV column names, e.g. `z` in `z_start`.
    pub fn column_prefix(self) -> String {
        match self {
            Self::Z => "z".to_string(),
            Self::Y => "y".to_string(),
            Self::X => "x".to_string(),
            Self::Indexed(index) => format!("axis_{index}"),
        }
    }
}

pub fn axis_kinds(ndim: usize) -> Vec<AxisKind> {
    (0..ndim)
        .map(|index| AxisKind::for_index(index, ndim))
        .collect()
}
