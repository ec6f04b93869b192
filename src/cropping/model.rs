use std::path::{Path, PathBuf};

use crate::config::CropConfig;
use crate::host::{LayerId, Viewer};
use crate::model::{CoreError, PropertySchema, RoiAttributes, Scale};

use super::export::{CropRow, row_label, write_csv};
use super::{CroppingError, Result};

/// Per-box bookkeeping for one cropping session.
///
/// Geometry lives in the viewer's shapes layer; this type derives and maintains the
/// index-aligned [`RoiAttributes`] next to it. Range endpoints, cursor positions and
/// geometry are pixel units; the `_physical` readers and the CSV apply the scale.
#[derive(Debug, Clone)]
pub struct CroppingModel {
    shapes_layer: LayerId,
    schema: PropertySchema,
    ndim: usize,
    axis_offset: usize,
    scale: Scale,
    out_dir: PathBuf,
    min_px: Vec<f64>,
    max_px: Vec<f64>,
    precision: u32,
}

impl CroppingModel {
    pub fn new(
        viewer: &mut Viewer,
        shapes_layer: LayerId,
        scale: Scale,
        out_dir: PathBuf,
        config: &CropConfig,
    ) -> Result<Self> {
        let dims_ndim = viewer.dims().ndim();
        let shapes = viewer.shapes_mut(shapes_layer)?;
        shapes.set_text(config.label.clone());
        let ndim = shapes.ndim();
        let schema = shapes.schema();
        if dims_ndim < ndim {
            return Err(CroppingError::DimsMismatch {
                layer_ndim: ndim,
                dims_ndim,
            });
        }
        if scale.ndim() != ndim {
            return Err(CoreError::ScaleLengthMismatch {
                ndim,
                scale_len: scale.ndim(),
            }
            .into());
        }

        let axis_offset = dims_ndim - ndim;
        let (min_px, max_px): (Vec<f64>, Vec<f64>) = (0..ndim)
            .map(|axis| viewer.dims().range(axis + axis_offset).unwrap_or((0.0, 0.0)))
            .unzip();
        Ok(Self {
            shapes_layer,
            schema,
            ndim,
            axis_offset,
            scale,
            out_dir,
            min_px,
            max_px,
            precision: config.precision,
        })
    }

    pub fn shapes_layer(&self) -> LayerId {
        self.shapes_layer
    }

    pub fn schema(&self) -> PropertySchema {
        self.schema
    }

    pub fn ndim(&self) -> usize {
        self.ndim
    }

    pub fn scale(&self) -> &Scale {
        &self.scale
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Maps a viewer axis onto this layer's axes; layers align with the trailing
    /// viewer axes.
    pub fn layer_axis(&self, viewer_axis: usize) -> Option<usize> {
        viewer_axis
            .checked_sub(self.axis_offset)
            .filter(|axis| *axis < self.ndim)
    }

    pub fn viewer_axis(&self, layer_axis: usize) -> usize {
        layer_axis + self.axis_offset
    }

    /// The axis a newly drawn box tracks: the viewer's primary scroll axis.
    pub fn default_track_axis(&self, viewer: &Viewer) -> Option<usize> {
        if !self.schema.tracks_axis() {
            return None;
        }
        Some(
            viewer
                .dims()
                .primary_axis()
                .and_then(|axis| self.layer_axis(axis))
                .unwrap_or(0),
        )
    }

    pub fn axis_extent(&self, axis: usize) -> Result<(f64, f64)> {
        match (self.min_px.get(axis), self.max_px.get(axis)) {
            (Some(min), Some(max)) => Ok((*min, *max)),
            _ => Err(CoreError::AxisOutOfRange {
                axis,
                ndim: self.ndim,
            }
            .into()),
        }
    }

    // ---- ROI helpers ----

    pub fn num_rois(&self, viewer: &Viewer) -> Result<usize> {
        Ok(viewer.shapes(self.shapes_layer)?.len())
    }

    /// The selected box if exactly one is selected.
    pub fn get_selected_single_roi_index(&self, viewer: &Viewer) -> Result<Option<usize>> {
        let selected = viewer.shapes(self.shapes_layer)?.selected();
        if selected.len() != 1 {
            return Ok(None);
        }
        Ok(selected.iter().next().copied())
    }

    fn check_index(&self, viewer: &Viewer, idx: usize) -> Result<()> {
        let count = self.num_rois(viewer)?;
        if idx >= count {
            return Err(CroppingError::RoiIndex { index: idx, count });
        }
        Ok(())
    }

    /// Stored attributes of box `idx`; a slot not yet created reads as unset.
    fn stored(&self, viewer: &Viewer, idx: usize) -> Result<RoiAttributes> {
        self.check_index(viewer, idx)?;
        Ok(viewer
            .shapes(self.shapes_layer)?
            .properties()
            .get(idx)
            .cloned()
            .unwrap_or_default())
    }

    pub fn get_track_axis(&self, viewer: &Viewer, idx: usize) -> Result<Option<usize>> {
        let stored = self.stored(viewer, idx)?;
        if !self.schema.tracks_axis() {
            return Ok(None);
        }
        Ok(stored.track_axis.or_else(|| self.default_track_axis(viewer)))
    }

    pub fn get_scroll_start(&self, viewer: &Viewer, idx: usize) -> Result<Option<f64>> {
        let Some(axis) = self.get_track_axis(viewer, idx)? else {
            return Ok(None);
        };
        let stored = self.stored(viewer, idx)?;
        Ok(Some(match stored.scroll_start {
            Some(value) => value,
            None => self.axis_extent(axis)?.0,
        }))
    }

    pub fn get_scroll_end(&self, viewer: &Viewer, idx: usize) -> Result<Option<f64>> {
        let Some(axis) = self.get_track_axis(viewer, idx)? else {
            return Ok(None);
        };
        let stored = self.stored(viewer, idx)?;
        Ok(Some(match stored.scroll_end {
            Some(value) => value,
            None => self.axis_extent(axis)?.1,
        }))
    }

    pub fn get_scroll_start_physical(&self, viewer: &Viewer, idx: usize) -> Result<Option<f64>> {
        self.to_physical(viewer, idx, self.get_scroll_start(viewer, idx)?)
    }

    pub fn get_scroll_end_physical(&self, viewer: &Viewer, idx: usize) -> Result<Option<f64>> {
        self.to_physical(viewer, idx, self.get_scroll_end(viewer, idx)?)
    }

    fn to_physical(&self, viewer: &Viewer, idx: usize, value: Option<f64>) -> Result<Option<f64>> {
        match (value, self.get_track_axis(viewer, idx)?) {
            (Some(value), Some(axis)) => Ok(Some(self.scale.to_physical(axis, value)?)),
            _ => Ok(None),
        }
    }

    fn slot_mut<'a>(&self, viewer: &'a mut Viewer, idx: usize) -> Result<&'a mut RoiAttributes> {
        self.check_index(viewer, idx)?;
        let properties = viewer.shapes_mut(self.shapes_layer)?.properties_mut();
        let len = properties.len();
        properties
            .get_mut(idx)
            .ok_or(CroppingError::PropertiesOutOfSync { index: idx, len })
    }

    /// Sets the start endpoint. Endpoint order is only enforced when exporting.
    pub fn set_scroll_start(&self, viewer: &mut Viewer, idx: usize, value: f64) -> Result<()> {
        self.slot_mut(viewer, idx)?.scroll_start = Some(value);
        Ok(())
    }

    pub fn set_scroll_end(&self, viewer: &mut Viewer, idx: usize, value: f64) -> Result<()> {
        self.slot_mut(viewer, idx)?.scroll_end = Some(value);
        Ok(())
    }

    /// Gives box `idx` the defaults of a freshly drawn box: the primary scroll axis
    /// and that axis' full extent.
    pub fn assign_defaults(&self, viewer: &mut Viewer, idx: usize) -> Result<()> {
        let Some(axis) = self.default_track_axis(viewer) else {
            return Ok(());
        };
        let (min, max) = self.axis_extent(axis)?;
        let slot = self.slot_mut(viewer, idx)?;
        slot.track_axis = Some(axis);
        slot.scroll_start = Some(min);
        slot.scroll_end = Some(max);
        Ok(())
    }

    pub fn clear_rois(&self, viewer: &mut Viewer) -> Result<()> {
        viewer.set_shape_data(self.shapes_layer, Vec::new())?;
        let shapes = viewer.shapes_mut(self.shapes_layer)?;
        shapes.set_selected(Default::default());
        shapes.set_properties(Vec::new());
        Ok(())
    }

    /// Rewrites every attribute slot from the current derived values so that the
    /// property table has exactly one slot per box. Run after every structural
    /// change before reading or writing attributes by index.
    pub fn sync_properties(&self, viewer: &mut Viewer) -> Result<()> {
        let current: &Viewer = viewer;
        let properties = (0..self.num_rois(current)?)
            .map(|idx| -> Result<RoiAttributes> {
                Ok(RoiAttributes {
                    id: idx.to_string(),
                    track_axis: self.get_track_axis(current, idx)?,
                    scroll_start: self.get_scroll_start(current, idx)?,
                    scroll_end: self.get_scroll_end(current, idx)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        viewer
            .shapes_mut(self.shapes_layer)?
            .set_properties(properties);
        Ok(())
    }

    /// Min/max vertex coordinate of box `idx` along `axis`, in pixels.
    pub fn box_extent(&self, viewer: &Viewer, idx: usize, axis: usize) -> Result<(f64, f64)> {
        self.check_index(viewer, idx)?;
        let shapes = viewer.shapes(self.shapes_layer)?;
        let vertices = shapes
            .shape(idx)
            .ok_or(CroppingError::RoiIndex {
                index: idx,
                count: shapes.len(),
            })?;
        if axis >= vertices.ncols() {
            return Err(CoreError::AxisOutOfRange {
                axis,
                ndim: vertices.ncols(),
            }
            .into());
        }
        let column = vertices.column(axis);
        let min = column.iter().copied().fold(f64::INFINITY, f64::min);
        let max = column.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Ok((min, max))
    }

    // ---- saving ----

    /// Physical `(start, end)` per axis for every box. The tracked axis uses the
    /// stored sub-range, every other axis the box geometry.
    pub fn crop_rows(&self, viewer: &Viewer, tag: &str) -> Result<Vec<CropRow>> {
        (0..self.num_rois(viewer)?)
            .map(|idx| -> Result<CropRow> {
                let track_axis = self.get_track_axis(viewer, idx)?;
                let ranges = (0..self.ndim)
                    .map(|axis| -> Result<(f64, f64)> {
                        let (start, end) = if Some(axis) == track_axis {
                            let start = self.get_scroll_start(viewer, idx)?.unwrap_or_default();
                            let end = self.get_scroll_end(viewer, idx)?.unwrap_or_default();
                            RoiAttributes::ordered_range(start, end)
                        } else {
                            self.box_extent(viewer, idx, axis)?
                        };
                        Ok((
                            self.scale.to_physical(axis, start)?,
                            self.scale.to_physical(axis, end)?,
                        ))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(CropRow {
                    label: row_label(tag, idx),
                    ranges,
                })
            })
            .collect()
    }

    /// Writes every box to `out_path` in physical units and returns the path written.
    pub fn save_csv(&self, viewer: &Viewer, out_path: &Path, tag: &str) -> Result<PathBuf> {
        let rows = self.crop_rows(viewer, tag.trim())?;
        write_csv(out_path, self.ndim, &rows, self.precision)?;
        log::info!("wrote {} ROIs to {}", rows.len(), out_path.display());
        Ok(out_path.to_path_buf())
    }
}
