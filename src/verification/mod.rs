//! Verification pipeline
//!
//! request -> VerificationInput -> (SequenceExpander) -> VerificationEngine
//! -> RunOutcome -> ReportAssembler -> VerificationReport

pub mod battery;
pub mod engine;
pub mod input;
pub mod step;

pub use battery::BatteryMeter;
pub use engine::{RunOutcome, VerificationEngine};
pub use input::{parse_action_list, TargetInput, VerificationInput};
pub use step::{StepRecord, ValidationResult};
