use std::path::{Path, PathBuf};

use crate::config::CropConfig;

/// State of the ROI list and save form shown next to the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct CroppingPanel {
    roi_labels: Vec<String>,
    tag: String,
    output_path: PathBuf,
}

impl CroppingPanel {
    pub fn new(out_dir: &Path, config: &CropConfig) -> Self {
        Self {
            roi_labels: Vec::new(),
            tag: String::new(),
            output_path: out_dir.join(&config.default_file_name),
        }
    }

    pub fn roi_labels(&self) -> &[String] {
        &self.roi_labels
    }

    pub fn set_roi_labels(&mut self, labels: Vec<String>) {
        self.roi_labels = labels;
    }

    /// The ROI tag with surrounding whitespace removed.
    pub fn tag(&self) -> &str {
        self.tag.trim()
    }

    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.tag = tag.into();
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn set_output_path(&mut self, path: impl Into<PathBuf>) {
        self.output_path = path.into();
    }
}
