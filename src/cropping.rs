mod controller;
mod error;
mod export;
mod model;
mod panel;

#[cfg(test)]
mod tests;

pub use controller::CroppingController;
pub use error::{CroppingError, Result};
pub use export::{CropRow, column_names, row_label};
pub use model::CroppingModel;
pub use panel::CroppingPanel;
