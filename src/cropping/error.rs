use thiserror::Error;

use crate::host::HostError;
use crate::model::CoreError;

pub type Result<T> = std::result::Result<T, CroppingError>;

#[derive(Debug, Error)]
pub enum CroppingError {
    #[error("ROI index {index} out of range for {count} ROIs")]
    RoiIndex { index: usize, count: usize },

    #[error("ROI properties out of sync: no slot {index} among {len}; resynchronise first")]
    PropertiesOutOfSync { index: usize, len: usize },

    #[error("viewer has {dims_ndim} dimensions but the shapes layer has {layer_ndim}")]
    DimsMismatch { layer_ndim: usize, dims_ndim: usize },

    #[error("CSV export failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("viewer failure: {0}")]
    Host(#[from] HostError),

    #[error("scale failure: {0}")]
    Core(#[from] CoreError),
}
