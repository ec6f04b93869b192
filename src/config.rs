mod error;
mod io;


use serde::{Deserialize, Serialize};

use crate::host::TextConfig;

pub use error::{ConfigError, Result};
pub(crate) use io::is_yaml;
pub use io::load_config;

/// Most decimal places an export keeps.
pub const MAX_PRECISION: u32 = 12;

/// User-tunable settings of a cropping session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropConfig {
    pub shapes_layer_name: String,
    pub label: TextConfig,
    pub default_file_name: String,
    /// Decimal places kept in exported coordinates.
    pub precision: u32,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            shapes_layer_name: "Cropping Box".to_string(),
            label: TextConfig::default(),
            default_file_name: "rois.csv".to_string(),
            precision: 3,
        }
    }
}

impl CropConfig {
    pub fn validate(&self) -> Result<()> {
        if self.shapes_layer_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "shapes layer name must not be empty".to_string(),
            ));
        }
        if self.default_file_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "default file name must not be empty".to_string(),
            ));
        }
        if self.precision > MAX_PRECISION {
            return Err(ConfigError::Invalid(format!(
                "precision {} exceeds {MAX_PRECISION} decimal places",
                self.precision
            )));
        }
        Ok(())
    }
}
