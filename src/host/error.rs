use thiserror::Error;

use super::LayerId;

pub type Result<T> = std::result::Result<T, HostError>;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("unknown layer: {0}")]
    UnknownLayer(LayerId),

    #[error("layer {0} is not a shapes layer")]
    NotShapes(LayerId),

    #[error("shape index {index} out of range for {count} shapes")]
    ShapeIndex { index: usize, count: usize },

    #[error("vertex dimensionality mismatch: layer has {expected} dimensions, vertices have {found}")]
    VertexDimension { expected: usize, found: usize },

    #[error("axis {axis} is out of range for {ndim} viewer dimensions")]
    AxisOutOfRange { axis: usize, ndim: usize },

    #[error("invalid axis order {0:?}: must be a permutation of the viewer axes")]
    InvalidOrder(Vec<usize>),

    #[error("layer position {index} out of range for {count} layers")]
    LayerPosition { index: usize, count: usize },

    #[error("invalid shape: {0}")]
    InvalidShape(String),
}
