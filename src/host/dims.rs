use serde::{Deserialize, Serialize};

use super::{HostError, Result};

/// Viewer dimensions: per-axis index range, display order and cursor position.
///
/// All values are in pixel/index units. `order[0]` is the axis the user scrolls
/// through; the last two entries of `order` are the displayed plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dims {
    range: Vec<(f64, f64)>,
    order: Vec<usize>,
    current_step: Vec<usize>,
}

impl Dims {
    pub fn new(range: Vec<(f64, f64)>) -> Self {
        let order = (0..range.len()).collect();
        let current_step = range
            .iter()
            .map(|(min, _)| min.max(0.0).round() as usize)
            .collect();
        Self {
            range,
            order,
            current_step,
        }
    }

    pub fn from_shape(shape: &[usize]) -> Self {
        Self::new(
            shape
                .iter()
                .map(|size| (0.0, size.saturating_sub(1) as f64))
                .collect(),
        )
    }

    pub fn ndim(&self) -> usize {
        self.range.len()
    }

    pub fn range(&self, axis: usize) -> Option<(f64, f64)> {
        self.range.get(axis).copied()
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn primary_axis(&self) -> Option<usize> {
        self.order.first().copied()
    }

    pub fn displayed_axes(&self) -> Option<(usize, usize)> {
        match self.order.as_slice() {
            [.., row, col] => Some((*row, *col)),
            _ => None,
        }
    }

    pub fn current_step(&self, axis: usize) -> Option<usize> {
        self.current_step.get(axis).copied()
    }

    pub fn current_steps(&self) -> &[usize] {
        &self.current_step
    }

    /// Moves the cursor along `axis`, clamped to the axis range. Returns whether the
    /// position changed.
    pub(crate) fn set_current_step(&mut self, axis: usize, step: usize) -> Result<bool> {
        let (min, max) = self.range(axis).ok_or(HostError::AxisOutOfRange {
            axis,
            ndim: self.ndim(),
        })?;
        let (low, high) = (min.max(0.0), max.max(0.0));
        let clamped = (step as f64).clamp(low.min(high), low.max(high)).round() as usize;
        let slot = &mut self.current_step[axis];
        if *slot == clamped {
            return Ok(false);
        }
        *slot = clamped;
        Ok(true)
    }

    pub(crate) fn set_order(&mut self, order: Vec<usize>) -> Result<()> {
        let mut sorted = order.clone();
        sorted.sort_unstable();
        if sorted != (0..self.ndim()).collect::<Vec<_>>() {
            return Err(HostError::InvalidOrder(order));
        }
        self.order = order;
        Ok(())
    }
}
