use thiserror::Error;

use crate::cropping::CroppingError;
use crate::host::HostError;
use crate::model::CoreError;

pub type Result<T> = std::result::Result<T, SelectionError>;

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("cropping session error: {0}")]
    Cropping(#[from] CroppingError),

    #[error("viewer error: {0}")]
    Host(#[from] HostError),

    #[error("target layer error: {0}")]
    Core(#[from] CoreError),

    #[error("output directory error: {0}")]
    Io(#[from] std::io::Error),
}
