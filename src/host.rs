mod dims;
mod error;
mod events;
mod layer;
mod shapes;
mod viewer;


pub use dims::Dims;
pub use error::{HostError, Result};
pub use events::ViewerEvent;
pub use layer::{Layer, LayerId, LayerKind};
pub use shapes::{ShapesLayer, TextConfig};
pub use viewer::Viewer;
