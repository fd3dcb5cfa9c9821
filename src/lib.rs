//! Sequence Verifier - action-sequence verification against a rule-based world state

pub mod core;
pub mod expansion;
pub mod graph;
pub mod oracle;
pub mod report;
pub mod service;
pub mod verification;

pub use crate::core::config::VerifierConfig;
pub use crate::core::error::{Result, VerifierError};
pub use crate::core::types::{Action, Position, RawAction};
pub use crate::oracle::{FactSet, RuleBase, RuleBaseOracle, WorldStateOracle};
pub use crate::report::VerificationReport;
pub use crate::service::{OracleFactory, VerificationService};
pub use crate::verification::{ValidationResult, VerificationEngine, VerificationInput};
