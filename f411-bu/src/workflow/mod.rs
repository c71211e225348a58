//! Upload workflow: wizard step machine and the owned session context

pub mod context;
pub mod step;

pub use context::{Generation, UploadContext};
pub use step::WizardStep;
