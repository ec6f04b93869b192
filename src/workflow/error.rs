use thiserror::Error;

use crate::config::ConfigError;
use crate::host::HostError;
use crate::selection::SelectionError;

pub type Result<T> = std::result::Result<T, WorkflowError>;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("session script parse failure: {0}")]
    Parse(String),

    #[error("session script I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("session script serialization failure: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("session script YAML serialization failure: {0}")]
    SerdeYaml(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("step {step} references unknown layer `{name}`")]
    UnknownLayer { step: usize, name: String },

    #[error("viewer rejected a scripted action: {0}")]
    Host(#[from] HostError),

    #[error("cropping session failed: {0}")]
    Selection(#[from] SelectionError),
}
