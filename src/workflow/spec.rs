use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{Result, WorkflowError};

/// A recorded cropping session: the viewer it starts from and the user actions to
/// replay against it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionScript {
    pub name: Option<String>,
    pub dims: DimsSpec,
    #[serde(default)]
    pub layers: Vec<LayerSpec>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DimsSpec {
    pub shape: Vec<usize>,
    #[serde(default)]
    pub order: Option<Vec<usize>>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LayerSpecKind {
    #[default]
    Image,
    Labels,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayerSpec {
    pub name: String,
    #[serde(default)]
    pub kind: LayerSpecKind,
    /// Defaults to the viewer's dimensionality.
    #[serde(default)]
    pub ndim: Option<usize>,
    #[serde(default)]
    pub scale: Option<Vec<f64>>,
    #[serde(default)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    ChooseLayer { layer: String },
    Confirm,
    Reset,
    DrawBox { start: Vec<f64>, end: Vec<f64> },
    RemoveBox { index: usize },
    Select { indices: Vec<usize> },
    MoveCursor { axis: usize, step: usize },
    SetOrder { order: Vec<usize> },
    SetStart,
    SetEnd,
    Clear,
    SetTag { tag: String },
    SetOutput { path: PathBuf },
    Save,
    RemoveLayer { layer: String },
    RenameLayer { layer: String, name: String },
}

impl Step {
    pub fn action(&self) -> &'static str {
        match self {
            Self::ChooseLayer { .. } => "choose_layer",
            Self::Confirm => "confirm",
            Self::Reset => "reset",
            Self::DrawBox { .. } => "draw_box",
            Self::RemoveBox { .. } => "remove_box",
            Self::Select { .. } => "select",
            Self::MoveCursor { .. } => "move_cursor",
            Self::SetOrder { .. } => "set_order",
            Self::SetStart => "set_start",
            Self::SetEnd => "set_end",
            Self::Clear => "clear",
            Self::SetTag { .. } => "set_tag",
            Self::SetOutput { .. } => "set_output",
            Self::Save => "save",
            Self::RemoveLayer { .. } => "remove_layer",
            Self::RenameLayer { .. } => "rename_layer",
        }
    }
}

fn is_permutation(order: &[usize], ndim: usize) -> bool {
    order.len() == ndim && order.iter().copied().collect::<BTreeSet<_>>() == (0..ndim).collect()
}

impl SessionScript {
    pub fn ndim(&self) -> usize {
        self.dims.shape.len()
    }

    pub fn validate(&self) -> Result<()> {
        let ndim = self.ndim();
        if ndim < 2 {
            return Err(WorkflowError::Parse(format!(
                "viewer needs at least two dimensions, got {ndim}"
            )));
        }
        if self.dims.shape.contains(&0) {
            return Err(WorkflowError::Parse(
                "viewer shape must not contain empty axes".to_string(),
            ));
        }
        if let Some(order) = &self.dims.order {
            if !is_permutation(order, ndim) {
                return Err(WorkflowError::Parse(format!(
                    "dims order {order:?} is not a permutation of 0..{ndim}"
                )));
            }
        }

        let mut names = BTreeSet::new();
        for layer in &self.layers {
            if layer.name.trim().is_empty() {
                return Err(WorkflowError::Parse("layer name must not be empty".to_string()));
            }
            if !names.insert(layer.name.as_str()) {
                return Err(WorkflowError::Parse(format!(
                    "layer `{}` is declared twice",
                    layer.name
                )));
            }
            let layer_ndim = layer.ndim.unwrap_or(ndim);
            if !(2..=ndim).contains(&layer_ndim) {
                return Err(WorkflowError::Parse(format!(
                    "layer `{}` has {layer_ndim} dimensions; expected 2 to {ndim}",
                    layer.name
                )));
            }
            if let Some(scale) = &layer.scale {
                if scale.len() != layer_ndim {
                    return Err(WorkflowError::Parse(format!(
                        "layer `{}` declares {} scale factors for {layer_ndim} dimensions",
                        layer.name,
                        scale.len()
                    )));
                }
            }
        }

        if self.steps.is_empty() {
            return Err(WorkflowError::Parse(
                "session script must include at least one step".to_string(),
            ));
        }
        for (index, step) in self.steps.iter().enumerate() {
            match step {
                Step::DrawBox { start, end } if start.len() != ndim || end.len() != ndim => {
                    return Err(WorkflowError::Parse(format!(
                        "draw_box at step {index} needs {ndim} coordinates per corner"
                    )));
                }
                Step::SetOrder { order } if !is_permutation(order, ndim) => {
                    return Err(WorkflowError::Parse(format!(
                        "set_order at step {index} is not a permutation of 0..{ndim}"
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }
}
