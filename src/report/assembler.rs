//! Report assembly: pure aggregation of a finished run

use serde::{Deserialize, Serialize};

use crate::graph::StateGraph;
use crate::oracle::FactSet;
use crate::verification::engine::RunOutcome;
use crate::verification::step::{StepRecord, ValidationResult};

pub const SUMMARY_VALID: &str = "VALID SEQUENCE";
pub const SUMMARY_INVALID: &str = "INVALID SEQUENCE";

/// One row of the `validation` array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationEntry {
    pub step: usize,
    pub action: String,
    pub result: ValidationResult,
    /// Comma-joined preconditions, or "none"
    pub precondition: String,
    pub precondition_met: bool,
    pub missing: Vec<String>,
    pub explanation: String,
    pub from_state: FactSet,
    pub to_state: FactSet,
    pub battery: u8,
}

impl From<StepRecord> for ValidationEntry {
    fn from(record: StepRecord) -> Self {
        Self {
            step: record.step,
            precondition: record.precondition_text(),
            precondition_met: record.result.is_valid(),
            action: record.action,
            result: record.result,
            missing: record.missing,
            explanation: record.explanation,
            from_state: record.state_before,
            to_state: record.state_after,
            battery: record.battery,
        }
    }
}

/// Complete verification report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub validation: Vec<ValidationEntry>,
    pub summary: String,
    pub summary_details: String,
    pub final_state: FactSet,
    pub final_battery: u8,
    pub battery_history: Vec<u8>,
    pub fsm: StateGraph,
    pub expanded_actions: Vec<String>,
}

impl VerificationReport {
    pub fn is_valid(&self) -> bool {
        self.summary == SUMMARY_VALID
    }

    /// Number of steps whose result is not `valid`
    pub fn invalid_count(&self) -> usize {
        self.validation
            .iter()
            .filter(|entry| !entry.result.is_valid())
            .count()
    }
}

/// Packages a [`RunOutcome`] into a [`VerificationReport`]
pub struct ReportAssembler;

impl ReportAssembler {
    pub fn assemble(outcome: RunOutcome) -> VerificationReport {
        let total = outcome.steps.len();
        let invalid = outcome
            .steps
            .iter()
            .filter(|step| !step.result.is_valid())
            .count();

        let (summary, summary_details) = if invalid == 0 {
            (SUMMARY_VALID, format!("All {} actions are valid.", total))
        } else {
            (
                SUMMARY_INVALID,
                format!("Found {} invalid action(s) out of {}.", invalid, total),
            )
        };

        VerificationReport {
            validation: outcome.steps.into_iter().map(ValidationEntry::from).collect(),
            summary: summary.to_string(),
            summary_details,
            final_state: outcome.final_state,
            final_battery: outcome.final_battery,
            battery_history: outcome.battery_history,
            fsm: outcome.graph,
            expanded_actions: outcome.actions,
        }
    }
}
