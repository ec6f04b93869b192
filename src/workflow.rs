mod error;
mod execute;
mod io;
mod report;
mod spec;


pub use error::{Result, WorkflowError};
pub use execute::run_script;
pub use io::{load_script, save_report};
pub use report::{SessionReport, StepReport};
pub use spec::{DimsSpec, LayerSpec, LayerSpecKind, SessionScript, Step};
