use std::fs;
use std::path::Path;

use super::{CropConfig, Result};

pub(crate) fn is_yaml(path: &Path) -> bool {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    matches!(extension.as_str(), "yaml" | "yml")
}

pub fn load_config(path: impl AsRef<Path>) -> Result<CropConfig> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)?;
    let config = if is_yaml(path) {
        serde_yaml::from_str::<CropConfig>(&raw)?
    } else {
        serde_json::from_str::<CropConfig>(&raw)?
    };
    config.validate()?;
    log::debug!("loaded configuration from {}", path.display());
    Ok(config)
}
