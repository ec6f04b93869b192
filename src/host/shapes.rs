use std::collections::BTreeSet;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::model::{PropertySchema, RoiAttributes};

use super::{HostError, Result};

/// On-canvas label configuration of a shapes layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Template; `{id}` is replaced by the box's display id.
    pub string: String,
    pub size: f32,
    pub color: String,
    pub anchor: String,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            string: "{id}".to_string(),
            size: 12.0,
            color: "white".to_string(),
            anchor: "upper_left".to_string(),
        }
    }
}

impl TextConfig {
    pub fn render(&self, attributes: &RoiAttributes) -> String {
        self.string.replace("{id}", &attributes.id)
    }
}

/// A layer of polygons, each an `n_vertices x ndim` array, with an index-aligned
/// property table.
///
/// Adding a shape does not extend `properties`; callers resynchronise the table
/// after structural edits. Removing a shape drops its property slot.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapesLayer {
    ndim: usize,
    schema: PropertySchema,
    data: Vec<Array2<f64>>,
    properties: Vec<RoiAttributes>,
    selected: BTreeSet<usize>,
    text: TextConfig,
}

impl ShapesLayer {
    pub fn new(ndim: usize, schema: PropertySchema) -> Self {
        Self {
            ndim,
            schema,
            data: Vec::new(),
            properties: Vec::new(),
            selected: BTreeSet::new(),
            text: TextConfig::default(),
        }
    }

    pub fn ndim(&self) -> usize {
        self.ndim
    }

    pub fn schema(&self) -> PropertySchema {
        self.schema
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[Array2<f64>] {
        &self.data
    }

    pub fn shape(&self, index: usize) -> Option<&Array2<f64>> {
        self.data.get(index)
    }

    pub fn properties(&self) -> &[RoiAttributes] {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut Vec<RoiAttributes> {
        &mut self.properties
    }

    pub fn set_properties(&mut self, properties: Vec<RoiAttributes>) {
        self.properties = properties;
    }

    pub fn selected(&self) -> &BTreeSet<usize> {
        &self.selected
    }

    /// Replaces the selection, dropping indices that do not name a shape.
    pub fn set_selected(&mut self, selected: BTreeSet<usize>) {
        let count = self.data.len();
        self.selected = selected.into_iter().filter(|index| *index < count).collect();
    }

    pub fn text(&self) -> &TextConfig {
        &self.text
    }

    pub fn set_text(&mut self, text: TextConfig) {
        self.text = text;
    }

    /// Rendered on-canvas labels, one per property slot.
    pub fn labels(&self) -> Vec<String> {
        self.properties
            .iter()
            .map(|attributes| self.text.render(attributes))
            .collect()
    }

    fn check_vertices(&self, vertices: &Array2<f64>) -> Result<()> {
        if vertices.ncols() != self.ndim {
            return Err(HostError::VertexDimension {
                expected: self.ndim,
                found: vertices.ncols(),
            });
        }
        if vertices.nrows() == 0 {
            return Err(HostError::InvalidShape("shape has no vertices".to_string()));
        }
        Ok(())
    }

    pub(crate) fn push(&mut self, vertices: Array2<f64>) -> Result<usize> {
        self.check_vertices(&vertices)?;
        self.data.push(vertices);
        Ok(self.data.len() - 1)
    }

    pub(crate) fn remove(&mut self, index: usize) -> Result<Array2<f64>> {
        if index >= self.data.len() {
            return Err(HostError::ShapeIndex {
                index,
                count: self.data.len(),
            });
        }
        let removed = self.data.remove(index);
        if index < self.properties.len() {
            self.properties.remove(index);
        }
        self.selected = self
            .selected
            .iter()
            .filter(|selected| **selected != index)
            .map(|selected| if *selected > index { selected - 1 } else { *selected })
            .collect();
        Ok(removed)
    }

    /// Replaces all geometry. Returns `false`, leaving the selection untouched, when
    /// nothing changed; otherwise the selection is cleared.
    pub(crate) fn replace_data(&mut self, data: Vec<Array2<f64>>) -> Result<bool> {
        for vertices in &data {
            self.check_vertices(vertices)?;
        }
        if data == self.data {
            return Ok(false);
        }
        self.data = data;
        self.selected.clear();
        Ok(true)
    }
}
