
use std::path::PathBuf;

use crate::config::CropConfig;
use crate::cropping::CroppingController;
use crate::host::{LayerId, Viewer};
use crate::notice::Notice;
use crate::selection::{LayerSelectionController, Result, SelectionState};

pub(crate) const NO_SESSION: &str = "Select a target layer and press 'Confirm' first.";

/// The dock widget: layer selection on top, the cropping session below it.
///
/// Viewer events are drained in FIFO order by [`CropTool::pump`]. Every button
/// handler pumps before acting, so it sees up-to-date attributes, and again
/// afterwards to deliver whatever its own edits announced.
#[derive(Debug, Clone)]
pub struct CropTool {
    selection: LayerSelectionController,
}

impl CropTool {
    pub fn new(viewer: &Viewer, config: CropConfig) -> Self {
        Self {
            selection: LayerSelectionController::new(viewer, config),
        }
    }

    pub fn selection(&self) -> &LayerSelectionController {
        &self.selection
    }

    pub fn state(&self) -> SelectionState {
        self.selection.state()
    }

    pub fn session(&self) -> Option<&CroppingController> {
        self.selection.session()
    }

    pub fn shapes_layer(&self) -> Option<LayerId> {
        self.selection.model().shapes_layer
    }

    /// Dispatches queued viewer events until the queue is empty. Returns how many
    /// were handled.
    pub fn pump(&mut self, viewer: &mut Viewer) -> Result<usize> {
        let mut handled = 0;
        while let Some(event) = viewer.poll_event() {
            log::debug!("dispatching {event:?}");
            self.selection.handle_event(viewer, event)?;
            handled += 1;
        }
        Ok(handled)
    }

    pub fn choose_layer(&mut self, viewer: &mut Viewer, name: &str) -> Result<Notice> {
        self.pump(viewer)?;
        Ok(self.selection.choose(name))
    }

    pub fn confirm(&mut self, viewer: &mut Viewer) -> Result<Notice> {
        self.pump(viewer)?;
        let notice = self.selection.on_confirm(viewer)?;
        self.pump(viewer)?;
        Ok(notice)
    }

    pub fn reset(&mut self, viewer: &mut Viewer) -> Result<Notice> {
        self.pump(viewer)?;
        let notice = self.selection.on_reset(viewer);
        self.pump(viewer)?;
        Ok(notice)
    }

    pub fn set_start(&mut self, viewer: &mut Viewer) -> Result<Notice> {
        self.with_session(viewer, |session, viewer| session.on_set_start(viewer))
    }

    pub fn set_end(&mut self, viewer: &mut Viewer) -> Result<Notice> {
        self.with_session(viewer, |session, viewer| session.on_set_end(viewer))
    }

    pub fn clear(&mut self, viewer: &mut Viewer) -> Result<Notice> {
        self.with_session(viewer, |session, viewer| session.on_clear_rois(viewer))
    }

    pub fn save(&mut self, viewer: &mut Viewer) -> Result<Notice> {
        self.with_session(viewer, |session, viewer| session.on_save(viewer))
    }

    pub fn set_tag(&mut self, tag: &str) -> Option<Notice> {
        match self.selection.session_mut() {
            Some(session) => {
                session.panel_mut().set_tag(tag);
                None
            }
            None => Some(Notice::warning(NO_SESSION)),
        }
    }

    pub fn set_output(&mut self, path: impl Into<PathBuf>) -> Option<Notice> {
        match self.selection.session_mut() {
            Some(session) => {
                session.panel_mut().set_output_path(path);
                None
            }
            None => Some(Notice::warning(NO_SESSION)),
        }
    }

    fn with_session<F>(&mut self, viewer: &mut Viewer, action: F) -> Result<Notice>
    where
        F: FnOnce(&mut CroppingController, &mut Viewer) -> crate::cropping::Result<Notice>,
    {
        self.pump(viewer)?;
        let Some(session) = self.selection.session_mut() else {
            return Ok(Notice::warning(NO_SESSION));
        };
        let notice = action(session, viewer)?;
        self.pump(viewer)?;
        Ok(notice)
    }
}
