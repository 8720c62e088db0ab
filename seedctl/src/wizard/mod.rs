pub mod payload;
pub mod state;
pub mod steps;
pub mod submit;

pub use state::WizardState;
pub use steps::{StepDescriptor, StepError, Wizard, STEPS};
