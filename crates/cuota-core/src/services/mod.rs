pub mod catalog_service;
pub mod inheritance;
pub mod settings;
pub mod split_validation;
pub mod status_guard;

pub use catalog_service::{CatalogService, NewRelease, Propagation, ReleaseSummary};
pub use inheritance::{FanOutReport, InheritanceService, TrackFanOut};
pub use settings::{FanOutMode, SplitSettings};
pub use split_validation::{
  ContractSplitCheck, ReleaseValidation, ShareBreakdown, SplitValidationService, TrackValidation,
};
pub use status_guard::{StatusGuard, TransitionOutcome};
