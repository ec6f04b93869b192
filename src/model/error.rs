use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("scale dimensionality mismatch: layer has {ndim} dimensions but scale has {scale_len}")]
    ScaleLengthMismatch { ndim: usize, scale_len: usize },

    #[error("invalid scale component {value} at axis {axis}: must be finite and positive")]
    InvalidScale { axis: usize, value: f64 },

    #[error("axis {axis} is out of range for a {ndim}-dimensional layer")]
    AxisOutOfRange { axis: usize, ndim: usize },
}
