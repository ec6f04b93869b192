use std::collections::VecDeque;

use ndarray::Array2;

use super::{Dims, HostError, Layer, LayerId, Result, ShapesLayer, ViewerEvent};

/// In-memory viewer: the layer list, the dims and a queue of pending events.
///
/// Every change a user or plugin makes goes through this type so that the matching
/// notification is queued. Writes that change nothing queue nothing.
#[derive(Debug, Clone)]
pub struct Viewer {
    dims: Dims,
    layers: Vec<(LayerId, Layer)>,
    next_id: u64,
    revision: u64,
    events: VecDeque<ViewerEvent>,
}

impl Viewer {
    pub fn new(dims: Dims) -> Self {
        Self {
            dims,
            layers: Vec::new(),
            next_id: 0,
            revision: 0,
            events: VecDeque::new(),
        }
    }

    pub fn dims(&self) -> &Dims {
        &self.dims
    }

    /// Layer-list revision, bumped on every insert, removal, move or rename.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn poll_event(&mut self) -> Option<ViewerEvent> {
        self.events.pop_front()
    }

    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    pub fn set_current_step(&mut self, axis: usize, step: usize) -> Result<()> {
        if self.dims.set_current_step(axis, step)? {
            self.events.push_back(ViewerEvent::DimsPoint { axis });
        }
        Ok(())
    }

    pub fn set_order(&mut self, order: Vec<usize>) -> Result<()> {
        self.dims.set_order(order)
    }

    // ---- layer list ----

    fn layers_changed(&mut self) {
        self.revision += 1;
        self.events.push_back(ViewerEvent::LayersChanged {
            revision: self.revision,
        });
    }

    pub fn add_layer(&mut self, layer: Layer) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;
        log::debug!("adding layer {id} `{}`", layer.name);
        self.layers.push((id, layer));
        self.layers_changed();
        id
    }

    pub fn remove_layer(&mut self, id: LayerId) -> Option<Layer> {
        let position = self.position(id)?;
        let (_, layer) = self.layers.remove(position);
        log::debug!("removed layer {id} `{}`", layer.name);
        self.layers_changed();
        Some(layer)
    }

    pub fn move_layer(&mut self, from: usize, to: usize) -> Result<()> {
        let count = self.layers.len();
        for index in [from, to] {
            if index >= count {
                return Err(HostError::LayerPosition { index, count });
            }
        }
        let entry = self.layers.remove(from);
        self.layers.insert(to, entry);
        self.layers_changed();
        Ok(())
    }

    pub fn rename_layer(&mut self, id: LayerId, name: impl Into<String>) -> Result<()> {
        let layer = self.layer_mut(id)?;
        layer.name = name.into();
        self.layers_changed();
        Ok(())
    }

    fn position(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|(layer_id, _)| *layer_id == id)
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.position(id).is_some()
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers
            .iter()
            .find(|(layer_id, _)| *layer_id == id)
            .map(|(_, layer)| layer)
    }

    fn layer_mut(&mut self, id: LayerId) -> Result<&mut Layer> {
        self.layers
            .iter_mut()
            .find(|(layer_id, _)| *layer_id == id)
            .map(|(_, layer)| layer)
            .ok_or(HostError::UnknownLayer(id))
    }

    pub fn layers(&self) -> impl Iterator<Item = (LayerId, &Layer)> {
        self.layers.iter().map(|(id, layer)| (*id, layer))
    }

    pub fn find_layer(&self, name: &str) -> Option<LayerId> {
        self.layers
            .iter()
            .find(|(_, layer)| layer.name == name)
            .map(|(id, _)| *id)
    }

    // ---- shapes ----

    pub fn shapes(&self, id: LayerId) -> Result<&ShapesLayer> {
        self.layer(id)
            .ok_or(HostError::UnknownLayer(id))?
            .as_shapes()
            .ok_or(HostError::NotShapes(id))
    }

    /// Mutable access for properties, selection and text. Geometry edits go through
    /// the viewer so that they are announced.
    pub fn shapes_mut(&mut self, id: LayerId) -> Result<&mut ShapesLayer> {
        self.layer_mut(id)?
            .as_shapes_mut()
            .ok_or(HostError::NotShapes(id))
    }

    pub fn add_shape(&mut self, id: LayerId, vertices: Array2<f64>) -> Result<usize> {
        let index = self.shapes_mut(id)?.push(vertices)?;
        self.events.push_back(ViewerEvent::ShapesData { layer: id });
        Ok(index)
    }

    /// Adds an axis-aligned rectangle spanning `start..end` in the displayed plane.
    /// Every other coordinate is taken from `start`.
    pub fn add_rectangle(&mut self, id: LayerId, start: &[f64], end: &[f64]) -> Result<usize> {
        let ndim = self.shapes(id)?.ndim();
        for corner in [start, end] {
            if corner.len() != ndim {
                return Err(HostError::VertexDimension {
                    expected: ndim,
                    found: corner.len(),
                });
            }
        }
        let (row, col) = self.displayed_layer_axes(ndim)?;
        let mut vertices = Array2::<f64>::zeros((4, ndim));
        for mut vertex in vertices.rows_mut() {
            vertex.assign(&ndarray::ArrayView1::from(start));
        }
        vertices[[1, col]] = end[col];
        vertices[[2, row]] = end[row];
        vertices[[2, col]] = end[col];
        vertices[[3, row]] = end[row];
        self.add_shape(id, vertices)
    }

    fn displayed_layer_axes(&self, ndim: usize) -> Result<(usize, usize)> {
        let (row, col) = self
            .dims
            .displayed_axes()
            .ok_or_else(|| HostError::InvalidShape("viewer has fewer than two axes".into()))?;
        let offset = self.dims.ndim().saturating_sub(ndim);
        match (row.checked_sub(offset), col.checked_sub(offset)) {
            (Some(row), Some(col)) => Ok((row, col)),
            _ => Err(HostError::InvalidShape(
                "displayed plane is not part of the shapes layer".into(),
            )),
        }
    }

    pub fn remove_shape(&mut self, id: LayerId, index: usize) -> Result<()> {
        self.shapes_mut(id)?.remove(index)?;
        self.events.push_back(ViewerEvent::ShapesData { layer: id });
        Ok(())
    }

    /// Replaces all geometry of a shapes layer. Announced only if something changed.
    pub fn set_shape_data(&mut self, id: LayerId, data: Vec<Array2<f64>>) -> Result<bool> {
        let changed = self.shapes_mut(id)?.replace_data(data)?;
        if changed {
            self.events.push_back(ViewerEvent::ShapesData { layer: id });
        }
        Ok(changed)
    }

    pub fn select_shapes(&mut self, id: LayerId, selected: impl IntoIterator<Item = usize>) -> Result<()> {
        self.shapes_mut(id)?
            .set_selected(selected.into_iter().collect());
        Ok(())
    }
}
