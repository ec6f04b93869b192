use crate::host::{LayerId, Viewer};

/// Layers bound to the current cropping session, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerSelectionModel {
    pub target_layer: Option<LayerId>,
    pub shapes_layer: Option<LayerId>,
}

impl LayerSelectionModel {
    pub fn clear_session_state(&mut self) {
        self.target_layer = None;
        self.shapes_layer = None;
    }

    /// Removes the session's shapes layer unless the user already deleted it.
    pub fn remove_shapes_if_any(&mut self, viewer: &mut Viewer) {
        if let Some(id) = self.shapes_layer.take() {
            if viewer.remove_layer(id).is_none() {
                log::debug!("shapes layer {id} was already removed");
            }
        }
    }
}
