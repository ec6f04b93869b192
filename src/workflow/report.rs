use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::notice::Notice;
use crate::selection::SelectionState;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepReport {
    pub index: usize,
    pub action: String,
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionReport {
    pub script_name: Option<String>,
    pub steps: Vec<StepReport>,
    pub final_state: SelectionState,
    pub roi_labels: Vec<String>,
    pub files_written: Vec<PathBuf>,
}

impl SessionReport {
    pub fn warnings(&self) -> impl Iterator<Item = &Notice> {
        self.steps
            .iter()
            .filter_map(|step| step.notice.as_ref())
            .filter(|notice| notice.is_warning())
    }
}
