pub mod catalog;
pub mod cleaning;
pub mod detector;
pub mod flow;
pub mod form;
pub mod property;
pub mod schema;

pub use catalog::{step_sequence, step_sequence_or_default, summary_sections};
pub use cleaning::{apply_publish_defaults, clean_steps, PublishDefaults};
pub use detector::{detect, Detection, DetectionSource, FlowSignals, ModeFlags};
pub use flow::{Category, FlowError, FlowType, ListingType, StepDefinition, StepKind};
pub use form::FormData;
pub use property::{ListingStatus, PropertyRecord, PropertySummary, StoredProperty};
