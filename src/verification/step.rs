//! Per-step verification records

use serde::{Deserialize, Serialize};

use crate::oracle::{FactSet, OracleVerdict};

pub const EXPLAIN_VALID: &str = "All preconditions satisfied.";
pub const EXPLAIN_INVALID_ACTION: &str = "Action is not defined in the rule base.";
pub const EXPLAIN_INVALID_FORMAT: &str = "Action value must be a string.";
pub const EXPLAIN_ERROR_PROCESSING: &str = "Internal error while querying the oracle.";
pub const EXPLAIN_UNSPECIFIED_PRECONDITION: &str = "One or more preconditions are not satisfied.";

/// Classification of one step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationResult {
    Valid,
    PreconditionFailed,
    InvalidAction,
    InvalidFormat,
    ErrorProcessing,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

impl From<OracleVerdict> for ValidationResult {
    fn from(verdict: OracleVerdict) -> Self {
        match verdict {
            OracleVerdict::Valid => ValidationResult::Valid,
            OracleVerdict::PreconditionFailed => ValidationResult::PreconditionFailed,
            OracleVerdict::InvalidAction => ValidationResult::InvalidAction,
        }
    }
}

/// Everything observed while processing one action
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    /// 1-based position in the verified sequence
    pub step: usize,
    pub action: String,
    pub result: ValidationResult,
    pub preconditions: Vec<String>,
    pub missing: Vec<String>,
    pub explanation: String,
    pub state_before: FactSet,
    pub state_after: FactSet,
    /// Battery level after this step
    pub battery: u8,
}

impl StepRecord {
    /// Comma-joined preconditions, or "none"
    pub fn precondition_text(&self) -> String {
        precondition_text(&self.preconditions)
    }
}

pub(crate) fn precondition_text(preconditions: &[String]) -> String {
    if preconditions.is_empty() {
        "none".to_string()
    } else {
        preconditions.join(", ")
    }
}

/// Explanation for a failed precondition check
pub(crate) fn missing_explanation(missing: &[String]) -> String {
    if missing.is_empty() {
        EXPLAIN_UNSPECIFIED_PRECONDITION.to_string()
    } else {
        format!("Missing preconditions: {}", missing.join(", "))
    }
}
