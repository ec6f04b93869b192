mod controller;
mod error;
mod model;
mod panel;


pub use controller::{LayerSelectionController, SelectionState};
pub use error::{Result, SelectionError};
pub use model::LayerSelectionModel;
pub use panel::{ButtonState, LayerChoice, SelectionPanel};
