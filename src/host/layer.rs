use std::fmt;
use std::path::{Path, PathBuf};

use crate::model::ScaleSource;

use super::ShapesLayer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerId(pub u64);

impl fmt::Display for LayerId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayerKind {
    Image,
    Labels,
    Shapes(ShapesLayer),
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub name: String,
    pub ndim: usize,
    pub scale: Option<Vec<f64>>,
    pub source: Option<PathBuf>,
    pub kind: LayerKind,
}

impl Layer {
    pub fn image(name: impl Into<String>, ndim: usize) -> Self {
        Self {
            name: name.into(),
            ndim,
            scale: None,
            source: None,
            kind: LayerKind::Image,
        }
    }

    pub fn labels(name: impl Into<String>, ndim: usize) -> Self {
        Self {
            kind: LayerKind::Labels,
            ..Self::image(name, ndim)
        }
    }

    pub fn shapes(name: impl Into<String>, shapes: ShapesLayer) -> Self {
        Self {
            ndim: shapes.ndim(),
            kind: LayerKind::Shapes(shapes),
            ..Self::image(name, 0)
        }
    }

    pub fn with_scale(mut self, scale: Vec<f64>) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Image and labels layers can be cropped.
    pub fn is_crop_target(&self) -> bool {
        matches!(self.kind, LayerKind::Image | LayerKind::Labels)
    }

    pub fn as_shapes(&self) -> Option<&ShapesLayer> {
        match &self.kind {
            LayerKind::Shapes(shapes) => Some(shapes),
            _ => None,
        }
    }

    pub fn as_shapes_mut(&mut self) -> Option<&mut ShapesLayer> {
        match &mut self.kind {
            LayerKind::Shapes(shapes) => Some(shapes),
            _ => None,
        }
    }
}

impl ScaleSource for Layer {
    fn ndim(&self) -> usize {
        self.ndim
    }

    fn declared_scale(&self) -> Option<&[f64]> {
        self.scale.as_deref()
    }
}
