//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, ModelClient, etc.)
//! but are themselves concrete structs, not traits.

mod assessment;
mod diagnostics;
mod lifecycle;
mod stack;

pub use assessment::{AssessmentService, FIRST_HOSTED, SECOND_HOSTED};
pub use diagnostics::{DiagnosticsService, DEBUG_LOG_FILE, STATUS_FILE};
pub use lifecycle::{BootPlan, LifecycleService};
pub use stack::StackService;
