use serde::{Deserialize, Serialize};

use super::{CoreError, Result};

/// Anything that can declare a per-axis pixel-to-physical scale.
pub trait ScaleSource {
    fn ndim(&self) -> usize;
    fn declared_scale(&self) -> Option<&[f64]>;
}

/// Physical units per pixel, one factor per axis in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scale(Vec<f64>);

impl Scale {
    pub fn ones(ndim: usize) -> Self {
        Self(vec![1.0; ndim])
    }

    pub fn new(factors: Vec<f64>) -> Result<Self> {
        for (axis, value) in factors.iter().enumerate() {
            if !value.is_finite() || *value <= 0.0 {
                return Err(CoreError::InvalidScale {
                    axis,
                    value: *value,
                });
            }
        }
        Ok(Self(factors))
    }

    pub fn ndim(&self) -> usize {
        self.0.len()
    }

    pub fn factors(&self) -> &[f64] {
        &self.0
    }

    pub fn factor(&self, axis: usize) -> Result<f64> {
        self.0
            .get(axis)
            .copied()
            .ok_or(CoreError::AxisOutOfRange {
                axis,
                ndim: self.0.len(),
            })
    }

    pub fn to_physical(&self, axis: usize, pixels: f64) -> Result<f64> {
        Ok(pixels * self.factor(axis)?)
    }
}

/// Resolves the scale of a layer, falling back to all ones when none is declared.
pub fn resolve_scale(layer: &impl ScaleSource) -> Result<Scale> {
    let ndim = layer.ndim();
    match layer.declared_scale() {
        None => Ok(Scale::ones(ndim)),
        Some(declared) if declared.len() != ndim => Err(CoreError::ScaleLengthMismatch {
            ndim,
            scale_len: declared.len(),
        }),
        Some(declared) => Scale::new(declared.to_vec()),
    }
}
