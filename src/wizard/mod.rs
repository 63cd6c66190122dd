pub mod controller;
pub mod validation;

pub use controller::{
    ReviewRow, Stage, SubmitAction, Submission, Transition, WizardError, WizardMode, WizardSession,
};
pub use validation::{validate_step, StepValidationError};
