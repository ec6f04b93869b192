mod attributes;
mod axis;
mod error;
mod scale;


pub use attributes::{PropertySchema, RoiAttributes};
pub use axis::{AxisKind, axis_kinds};
pub use error::{CoreError, Result};
pub use scale::{Scale, ScaleSource, resolve_scale};
