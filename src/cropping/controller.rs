use std::collections::BTreeSet;

use crate::host::{Viewer, ViewerEvent};
use crate::model::AxisKind;
use crate::notice::Notice;

use super::{CroppingModel, CroppingPanel, Result};

const SELECT_ONE: &str = "Select exactly one cropping box.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Start,
    End,
}

impl Endpoint {
    fn name(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

/// Reacts to viewer events and panel actions for one cropping session.
#[derive(Debug, Clone)]
pub struct CroppingController {
    model: CroppingModel,
    panel: CroppingPanel,
    last_selected: BTreeSet<usize>,
}

impl CroppingController {
    pub fn new(model: CroppingModel, panel: CroppingPanel, viewer: &mut Viewer) -> Result<Self> {
        let mut controller = Self {
            model,
            panel,
            last_selected: BTreeSet::new(),
        };
        controller.update_rois(viewer)?;
        Ok(controller)
    }

    pub fn model(&self) -> &CroppingModel {
        &self.model
    }

    pub fn panel(&self) -> &CroppingPanel {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut CroppingPanel {
        &mut self.panel
    }

    /// Dispatches one viewer event. Shape edits first refresh the attributes and
    /// labels, then remember the selection.
    pub fn handle_event(&mut self, viewer: &mut Viewer, event: ViewerEvent) -> Result<()> {
        if !viewer.contains(self.model.shapes_layer()) {
            return Ok(());
        }
        match event {
            ViewerEvent::ShapesData { layer } if layer == self.model.shapes_layer() => {
                self.update_rois(viewer)?;
                self.keep_last_selected(viewer)?;
            }
            ViewerEvent::DimsPoint { .. } => self.project_shapes(viewer)?,
            ViewerEvent::ShapesData { .. } | ViewerEvent::LayersChanged { .. } => {}
        }
        Ok(())
    }

    fn keep_last_selected(&mut self, viewer: &Viewer) -> Result<()> {
        let selected = viewer.shapes(self.model.shapes_layer())?.selected();
        if !selected.is_empty() {
            self.last_selected = selected.clone();
        }
        Ok(())
    }

    /// Assigns defaults to newly drawn boxes, resynchronises every attribute slot
    /// and re-renders the summary labels.
    pub fn update_rois(&mut self, viewer: &mut Viewer) -> Result<()> {
        let n = self.model.num_rois(viewer)?;
        let known = self.panel.roi_labels().len();
        if n > known {
            self.model.sync_properties(viewer)?;
            for idx in known..n {
                self.model.assign_defaults(viewer, idx)?;
            }
            log::debug!("{} new cropping box(es)", n - known);
        }
        self.model.sync_properties(viewer)?;
        let labels = self.summary_labels(viewer)?;
        self.panel.set_roi_labels(labels);
        Ok(())
    }

    pub fn summary_labels(&self, viewer: &Viewer) -> Result<Vec<String>> {
        let ndim = self.model.ndim();
        (0..self.model.num_rois(viewer)?)
            .map(|idx| -> Result<String> {
                let tracked = (
                    self.model.get_track_axis(viewer, idx)?,
                    self.model.get_scroll_start(viewer, idx)?,
                    self.model.get_scroll_end(viewer, idx)?,
                );
                if let (Some(axis), Some(start), Some(end)) = tracked {
                    let axis = AxisKind::for_index(axis, ndim).label();
                    return Ok(format!(
                        "ROI {idx:02}: {axis} start={start:?}, {axis} end={end:?}"
                    ));
                }
                let extents = (0..ndim)
                    .map(|axis| -> Result<String> {
                        let (min, max) = self.model.box_extent(viewer, idx, axis)?;
                        Ok(format!(
                            "{} {min}-{max}",
                            AxisKind::for_index(axis, ndim).label()
                        ))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(format!("ROI {idx:02}: {}", extents.join(", ")))
            })
            .collect()
    }

    /// Pins every box tracking the scrolled axis to the current slice, then
    /// restores the selection the rewrite cleared. Boxes already on the slice are
    /// left alone, so a repeated move does not announce another edit.
    pub fn project_shapes(&mut self, viewer: &mut Viewer) -> Result<()> {
        let layer = self.model.shapes_layer();
        let Some(viewer_axis) = viewer.dims().primary_axis() else {
            return Ok(());
        };
        let Some(axis) = self.model.layer_axis(viewer_axis) else {
            return Ok(());
        };
        let slice = viewer.dims().current_step(viewer_axis).unwrap_or_default() as f64;

        self.keep_last_selected(viewer)?;
        let mut data = viewer.shapes(layer)?.data().to_vec();
        for (idx, vertices) in data.iter_mut().enumerate() {
            if self.model.get_track_axis(viewer, idx)? == Some(axis) {
                vertices.column_mut(axis).fill(slice);
            }
        }
        if viewer.set_shape_data(layer, data)? {
            viewer.select_shapes(layer, self.last_selected.iter().copied())?;
        }
        Ok(())
    }

    fn layer_missing(&self, viewer: &Viewer) -> Option<Notice> {
        if viewer.contains(self.model.shapes_layer()) {
            return None;
        }
        Some(Notice::warning(
            "The cropping layer was removed. Press 'Reset' to start over.",
        ))
    }

    pub fn on_set_start(&mut self, viewer: &mut Viewer) -> Result<Notice> {
        self.set_endpoint(viewer, Endpoint::Start)
    }

    pub fn on_set_end(&mut self, viewer: &mut Viewer) -> Result<Notice> {
        self.set_endpoint(viewer, Endpoint::End)
    }

    fn set_endpoint(&mut self, viewer: &mut Viewer, endpoint: Endpoint) -> Result<Notice> {
        if let Some(notice) = self.layer_missing(viewer) {
            return Ok(notice);
        }
        if !self.model.schema().tracks_axis() {
            return Ok(Notice::warning("This layer has no scroll axis to track."));
        }
        let Some(idx) = self.model.get_selected_single_roi_index(viewer)? else {
            return Ok(Notice::warning(SELECT_ONE));
        };
        let Some(axis) = self.model.get_track_axis(viewer, idx)? else {
            return Ok(Notice::warning("This layer has no scroll axis to track."));
        };
        let step = viewer
            .dims()
            .current_step(self.model.viewer_axis(axis))
            .unwrap_or_default();
        match endpoint {
            Endpoint::Start => self.model.set_scroll_start(viewer, idx, step as f64)?,
            Endpoint::End => self.model.set_scroll_end(viewer, idx, step as f64)?,
        }
        self.update_rois(viewer)?;
        let axis = AxisKind::for_index(axis, self.model.ndim()).label();
        Ok(Notice::info(format!(
            "ROI {idx:02}: {axis} {} set to {step}.",
            endpoint.name()
        )))
    }

    pub fn on_clear_rois(&mut self, viewer: &mut Viewer) -> Result<Notice> {
        if let Some(notice) = self.layer_missing(viewer) {
            return Ok(notice);
        }
        self.last_selected.clear();
        self.model.clear_rois(viewer)?;
        self.update_rois(viewer)?;
        Ok(Notice::info("ROI list cleared!"))
    }

    pub fn on_save(&mut self, viewer: &mut Viewer) -> Result<Notice> {
        if let Some(notice) = self.layer_missing(viewer) {
            return Ok(notice);
        }
        if self.model.num_rois(viewer)? == 0 {
            return Ok(Notice::warning("No cropping box drawn!"));
        }
        let out_path = self.panel.output_path().to_path_buf();
        let is_csv = out_path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if !is_csv {
            return Ok(Notice::warning("Only CSV saving is implemented for now."));
        }
        let saved = self.model.save_csv(viewer, &out_path, self.panel.tag())?;
        let name = saved
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| saved.display().to_string());
        Ok(Notice::info(format!("ROI coordinates saved to {name}!")))
    }
}
