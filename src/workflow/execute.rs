use crate::config::CropConfig;
use crate::host::{Dims, Layer, LayerId, LayerKind, Viewer};
use crate::notice::Notice;
use crate::tool::{CropTool, NO_SESSION};

use super::{LayerSpec, LayerSpecKind, Result, SessionReport, SessionScript, Step, StepReport, WorkflowError};

/// Replays `script` against a fresh in-memory viewer and reports what the user
/// would have seen.
pub fn run_script(script: &SessionScript, config: &CropConfig) -> Result<SessionReport> {
    script.validate()?;
    config.validate()?;
    log::info!(
        "replaying {} step(s) of session `{}`",
        script.steps.len(),
        script.name.as_deref().unwrap_or("unnamed")
    );

    let mut viewer = Viewer::new(Dims::from_shape(&script.dims.shape));
    if let Some(order) = &script.dims.order {
        viewer.set_order(order.clone())?;
    }
    for spec in &script.layers {
        viewer.add_layer(build_layer(spec, script.ndim()));
    }
    let mut tool = CropTool::new(&viewer, config.clone());
    tool.pump(&mut viewer)?;

    let mut steps = Vec::with_capacity(script.steps.len());
    let mut files_written = Vec::new();
    for (index, step) in script.steps.iter().enumerate() {
        let notice = apply_step(&mut tool, &mut viewer, index, step)?;
        tool.pump(&mut viewer)?;

        let saved = matches!(step, Step::Save) && notice.as_ref().is_some_and(|n| !n.is_warning());
        if let (true, Some(session)) = (saved, tool.session()) {
            let path = session.panel().output_path().to_path_buf();
            if !files_written.contains(&path) {
                files_written.push(path);
            }
        }
        steps.push(StepReport {
            index,
            action: step.action().to_string(),
            notice,
        });
    }

    Ok(SessionReport {
        script_name: script.name.clone(),
        steps,
        final_state: tool.state(),
        roi_labels: tool
            .session()
            .map(|session| session.panel().roi_labels().to_vec())
            .unwrap_or_default(),
        files_written,
    })
}

fn build_layer(spec: &LayerSpec, viewer_ndim: usize) -> Layer {
    let ndim = spec.ndim.unwrap_or(viewer_ndim);
    let mut layer = match spec.kind {
        LayerSpecKind::Image => Layer::image(spec.name.clone(), ndim),
        LayerSpecKind::Labels => Layer::labels(spec.name.clone(), ndim),
        LayerSpecKind::Other => Layer {
            kind: LayerKind::Other,
            ..Layer::image(spec.name.clone(), ndim)
        },
    };
    if let Some(scale) = &spec.scale {
        layer = layer.with_scale(scale.clone());
    }
    if let Some(source) = &spec.source {
        layer = layer.with_source(source.clone());
    }
    layer
}

/// The session's shapes layer, or the warning a user would get for drawing
/// without one.
fn session_layer(tool: &CropTool, viewer: &Viewer) -> std::result::Result<LayerId, Notice> {
    match tool.shapes_layer() {
        Some(id) if viewer.contains(id) => Ok(id),
        Some(_) => Err(Notice::warning(
            "The cropping layer was removed. Press 'Reset' to start over.",
        )),
        None => Err(Notice::warning(NO_SESSION)),
    }
}

fn find_layer(viewer: &Viewer, step: usize, name: &str) -> Result<LayerId> {
    viewer
        .find_layer(name)
        .ok_or_else(|| WorkflowError::UnknownLayer {
            step,
            name: name.to_string(),
        })
}

fn apply_step(
    tool: &mut CropTool,
    viewer: &mut Viewer,
    index: usize,
    step: &Step,
) -> Result<Option<Notice>> {
    let notice = match step {
        Step::ChooseLayer { layer } => Some(tool.choose_layer(viewer, layer)?),
        Step::Confirm => Some(tool.confirm(viewer)?),
        Step::Reset => Some(tool.reset(viewer)?),
        Step::DrawBox { start, end } => match session_layer(tool, viewer) {
            Ok(id) => {
                viewer.add_rectangle(id, start, end)?;
                None
            }
            Err(notice) => Some(notice),
        },
        Step::RemoveBox { index: shape } => match session_layer(tool, viewer) {
            Ok(id) => {
                viewer.remove_shape(id, *shape)?;
                None
            }
            Err(notice) => Some(notice),
        },
        Step::Select { indices } => match session_layer(tool, viewer) {
            Ok(id) => {
                viewer.select_shapes(id, indices.iter().copied())?;
                None
            }
            Err(notice) => Some(notice),
        },
        Step::MoveCursor { axis, step } => {
            viewer.set_current_step(*axis, *step)?;
            None
        }
        Step::SetOrder { order } => {
            viewer.set_order(order.clone())?;
            None
        }
        Step::SetStart => Some(tool.set_start(viewer)?),
        Step::SetEnd => Some(tool.set_end(viewer)?),
        Step::Clear => Some(tool.clear(viewer)?),
        Step::Save => Some(tool.save(viewer)?),
        Step::SetTag { tag } => tool.set_tag(tag),
        Step::SetOutput { path } => tool.set_output(path.clone()),
        Step::RemoveLayer { layer } => {
            let id = find_layer(viewer, index, layer)?;
            viewer.remove_layer(id);
            None
        }
        Step::RenameLayer { layer, name } => {
            let id = find_layer(viewer, index, layer)?;
            viewer.rename_layer(id, name.clone())?;
            None
        }
    };
    Ok(notice)
}
