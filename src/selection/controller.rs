use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::CropConfig;
use crate::cropping::{CroppingController, CroppingModel, CroppingPanel};
use crate::host::{Layer, LayerId, ShapesLayer, Viewer, ViewerEvent};
use crate::model::{PropertySchema, resolve_scale};
use crate::notice::Notice;

use super::{LayerChoice, LayerSelectionModel, Result, SelectionPanel};

const SELECT_TARGET: &str = "Select a target layer to crop.";
const TARGET_SELECTED: &str = "Target layer selected! Press 'Reset' to change layer.";
const CHOICE_STALE: &str = "Layer choice changed. Press 'Reset' to change layer.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionState {
    Selecting,
    Cropping,
}

/// Chooses the target layer and owns the cropping session built on top of it.
#[derive(Debug, Clone)]
pub struct LayerSelectionController {
    config: CropConfig,
    model: LayerSelectionModel,
    panel: SelectionPanel,
    session: Option<CroppingController>,
    // layer-list revision right after the session's own shapes layer was added
    baseline_revision: u64,
    stale: bool,
}

impl LayerSelectionController {
    pub fn new(viewer: &Viewer, config: CropConfig) -> Self {
        let mut controller = Self {
            config,
            model: LayerSelectionModel::default(),
            panel: SelectionPanel::default(),
            session: None,
            baseline_revision: viewer.revision(),
            stale: false,
        };
        controller.refresh_layer_choices(viewer);
        controller
    }

    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    pub fn model(&self) -> &LayerSelectionModel {
        &self.model
    }

    pub fn panel(&self) -> &SelectionPanel {
        &self.panel
    }

    pub fn session(&self) -> Option<&CroppingController> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut CroppingController> {
        self.session.as_mut()
    }

    pub fn state(&self) -> SelectionState {
        if self.session.is_some() {
            SelectionState::Cropping
        } else {
            SelectionState::Selecting
        }
    }

    /// Whether the layer list changed after the running session was started.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn handle_event(&mut self, viewer: &mut Viewer, event: ViewerEvent) -> Result<()> {
        match event {
            ViewerEvent::LayersChanged { revision } => {
                self.refresh_layer_choices(viewer);
                if self.session.is_some() && revision > self.baseline_revision && !self.stale {
                    log::debug!("layer list changed during the cropping session");
                    self.stale = true;
                    self.panel.set_status(CHOICE_STALE);
                }
            }
            ViewerEvent::ShapesData { .. } | ViewerEvent::DimsPoint { .. } => {
                if let Some(session) = self.session.as_mut() {
                    session.handle_event(viewer, event)?;
                }
            }
        }
        Ok(())
    }

    /// Rebuilds the list of layers that can be cropped.
    pub fn refresh_layer_choices(&mut self, viewer: &Viewer) {
        let choices = viewer
            .layers()
            .filter(|(_, layer)| layer.is_crop_target())
            .map(|(id, layer)| LayerChoice {
                id,
                name: layer.name.clone(),
            })
            .collect();
        self.panel.reset_choices(choices);
        if self.session.is_none() {
            let has_choice = self.panel.chosen().is_some();
            self.panel.set_confirm_state(true, has_choice);
        }
    }

    pub fn choose(&mut self, name: &str) -> Notice {
        if self.panel.choose(name) {
            Notice::info(format!("Layer `{name}` chosen."))
        } else {
            Notice::warning(format!("No layer named `{name}` can be cropped."))
        }
    }

    pub fn on_confirm(&mut self, viewer: &mut Viewer) -> Result<Notice> {
        if self.session.is_some() {
            return Ok(Notice::warning(
                "Press 'Reset' before choosing another layer.",
            ));
        }
        let Some(target) = self.panel.chosen() else {
            return Ok(Notice::warning(SELECT_TARGET));
        };
        let Some(layer) = viewer.layer(target) else {
            self.refresh_layer_choices(viewer);
            return Ok(Notice::warning("The chosen layer no longer exists."));
        };

        let scale = resolve_scale(layer)?;
        let ndim = layer.ndim;
        let out_dir = output_dir(layer.source())?;
        let name = layer.name.clone();

        let shapes = ShapesLayer::new(ndim, PropertySchema::for_ndim(ndim));
        let shapes_layer = viewer.add_layer(
            Layer::shapes(self.config.shapes_layer_name.clone(), shapes)
                .with_scale(scale.factors().to_vec()),
        );
        let session = CroppingModel::new(viewer, shapes_layer, scale, out_dir.clone(), &self.config)
            .and_then(|model| {
                let panel = CroppingPanel::new(&out_dir, &self.config);
                CroppingController::new(model, panel, viewer)
            });
        let session = match session {
            Ok(session) => session,
            Err(err) => {
                viewer.remove_layer(shapes_layer);
                return Err(err.into());
            }
        };

        self.enter_cropping_session(viewer, target, shapes_layer, session);
        log::info!(
            "cropping `{name}` ({ndim}D), saving to {}",
            out_dir.display()
        );
        Ok(Notice::info(TARGET_SELECTED))
    }

    fn enter_cropping_session(
        &mut self,
        viewer: &Viewer,
        target: LayerId,
        shapes_layer: LayerId,
        session: CroppingController,
    ) {
        self.model.target_layer = Some(target);
        self.model.shapes_layer = Some(shapes_layer);
        self.session = Some(session);
        self.baseline_revision = viewer.revision();
        self.stale = false;
        self.panel.set_status(TARGET_SELECTED);
        self.panel.set_confirm_state(false, false);
        self.panel.set_reset_state(true, true);
    }

    pub fn on_reset(&mut self, viewer: &mut Viewer) -> Notice {
        if self.session.is_none() {
            return Notice::warning("No cropping session to reset.");
        }
        self.exit_cropping_session(viewer);
        Notice::info("Cropping session reset.")
    }

    fn exit_cropping_session(&mut self, viewer: &mut Viewer) {
        self.session = None;
        self.model.remove_shapes_if_any(viewer);
        self.model.clear_session_state();
        self.stale = false;
        self.baseline_revision = viewer.revision();
        self.panel.set_status(SELECT_TARGET);
        self.panel.set_reset_state(false, false);
        self.refresh_layer_choices(viewer);
        log::info!("cropping session closed");
    }
}

/// Directory holding the target's source file, or the working directory when the
/// layer was not loaded from disk.
fn output_dir(source: Option<&Path>) -> std::io::Result<PathBuf> {
    match source
        .and_then(Path::parent)
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        Some(parent) => Ok(parent.to_path_buf()),
        None => std::env::current_dir(),
    }
}
