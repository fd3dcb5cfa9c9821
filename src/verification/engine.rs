//! Verification engine: replays an action sequence against the oracle
//!
//! One run is strictly sequential. Each step's outcome depends on the fact
//! set left behind by the previous step, and every step is processed even
//! after a failure; per-step problems become step results, never errors.

use crate::core::config::VerifierConfig;
use crate::core::error::Result;
use crate::core::types::{Action, Position, RawAction};
use crate::expansion::SequenceExpander;
use crate::graph::{FsmEdge, NodeClass, StateGraph, StateGraphBuilder};
use crate::oracle::{FactSet, OracleError, OracleVerdict, WorldStateOracle};
use crate::report::{ReportAssembler, VerificationReport};
use crate::verification::battery::BatteryMeter;
use crate::verification::input::VerificationInput;
use crate::verification::step::{
    missing_explanation, precondition_text, StepRecord, ValidationResult, EXPLAIN_ERROR_PROCESSING,
    EXPLAIN_INVALID_ACTION, EXPLAIN_INVALID_FORMAT, EXPLAIN_VALID,
};

/// Raw results of one run, before report assembly
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    /// The sequence actually verified (after expansion)
    pub actions: Vec<String>,
    pub steps: Vec<StepRecord>,
    pub graph: StateGraph,
    pub final_state: FactSet,
    pub final_battery: u8,
    pub battery_history: Vec<u8>,
}

/// Runs verification against any [`WorldStateOracle`]
pub struct VerificationEngine<'a> {
    config: &'a VerifierConfig,
}

impl<'a> VerificationEngine<'a> {
    pub fn new(config: &'a VerifierConfig) -> Self {
        Self { config }
    }

    /// Verify a parsed request
    pub fn verify_input<O: WorldStateOracle>(
        &self,
        oracle: &mut O,
        input: &VerificationInput,
    ) -> Result<VerificationReport> {
        self.verify(oracle, &input.actions, &input.targets, input.auto_expand)
    }

    /// Optionally expand `actions`, run them, and assemble the report
    pub fn verify<O: WorldStateOracle>(
        &self,
        oracle: &mut O,
        actions: &[RawAction],
        targets: &[Position],
        auto_expand: bool,
    ) -> Result<VerificationReport> {
        let expanded;
        let sequence = if auto_expand {
            expanded = SequenceExpander::new(&self.config.expansion).expand(actions, targets);
            expanded.as_slice()
        } else {
            actions
        };

        let outcome = self.run(oracle, sequence)?;
        Ok(ReportAssembler::assemble(outcome))
    }

    /// Replay `actions` from a freshly reset oracle
    ///
    /// Only a failing reset is an error; it happens before any step runs.
    pub fn run<O: WorldStateOracle>(&self, oracle: &mut O, actions: &[RawAction]) -> Result<RunOutcome> {
        tracing::info!("Verifying sequence of {} action(s)", actions.len());

        oracle.reset()?;
        let initial = oracle.current_facts()?;

        let mut graph = StateGraphBuilder::new();
        graph.get_or_create(&initial, 0, NodeClass::Initial);
        let mut last_known = initial;
        let mut battery = BatteryMeter::new(&self.config.battery);
        let mut steps = Vec::with_capacity(actions.len());

        for (index, entry) in actions.iter().enumerate() {
            let step = index + 1;
            let eval = self.evaluate(oracle, entry, &last_known);
            let level = battery.record(entry.action(), eval.result);

            let valid = eval.result.is_valid();
            let class = if valid {
                NodeClass::Valid
            } else {
                NodeClass::Invalid
            };
            // Normally the previous step's node. After a failed after-snapshot
            // the oracle may have moved on, so the edge starts where the oracle
            // actually was.
            let from_node = graph.get_or_create(&eval.state_before, step, NodeClass::Invalid);
            let next_node = graph.get_or_create(&eval.state_after, step, class);
            graph.add_edge(FsmEdge {
                from: from_node,
                to: next_node,
                action: entry.display_name(),
                step,
                valid,
                precondition: precondition_text(&eval.preconditions),
            });

            tracing::debug!(
                step,
                action = %entry.display_name(),
                result = ?eval.result,
                battery = level,
                "step processed"
            );

            last_known = eval.state_after.clone();
            steps.push(StepRecord {
                step,
                action: entry.display_name(),
                result: eval.result,
                preconditions: eval.preconditions,
                missing: eval.missing,
                explanation: eval.explanation,
                state_before: eval.state_before,
                state_after: eval.state_after,
                battery: level,
            });
        }

        let final_state = oracle.current_facts().unwrap_or_else(|err| {
            tracing::warn!("Final state query failed, using last snapshot: {}", err);
            last_known
        });

        let invalid = steps.iter().filter(|s| !s.result.is_valid()).count();
        tracing::info!(
            "Verification finished: {} step(s), {} invalid, battery {}%",
            steps.len(),
            invalid,
            battery.level()
        );

        Ok(RunOutcome {
            actions: actions.iter().map(RawAction::display_name).collect(),
            steps,
            graph: graph.finish(),
            final_state,
            final_battery: battery.level(),
            battery_history: battery.into_history(),
        })
    }

    /// Classify one entry, never failing
    fn evaluate<O: WorldStateOracle>(&self, oracle: &mut O, entry: &RawAction, last_known: &FactSet) -> Evaluation {
        let mut eval = Evaluation::unchanged(last_known);

        let Some(action) = entry.action() else {
            eval.result = ValidationResult::InvalidFormat;
            eval.explanation = EXPLAIN_INVALID_FORMAT.to_string();
            return eval;
        };

        if let Err(err) = consult(oracle, action, &mut eval) {
            tracing::warn!("Oracle query failed for '{}': {}", action, err);
            eval.result = ValidationResult::ErrorProcessing;
            eval.explanation = EXPLAIN_ERROR_PROCESSING.to_string();
            eval.missing.clear();
        }
        eval
    }
}

/// Working state of one step
struct Evaluation {
    result: ValidationResult,
    preconditions: Vec<String>,
    missing: Vec<String>,
    explanation: String,
    state_before: FactSet,
    state_after: FactSet,
}

impl Evaluation {
    fn unchanged(state: &FactSet) -> Self {
        Self {
            result: ValidationResult::ErrorProcessing,
            preconditions: Vec::new(),
            missing: Vec::new(),
            explanation: EXPLAIN_ERROR_PROCESSING.to_string(),
            state_before: state.clone(),
            state_after: state.clone(),
        }
    }
}

/// Ask the oracle about one well-formed action, filling `eval` as answers arrive
fn consult<O: WorldStateOracle>(
    oracle: &mut O,
    action: &Action,
    eval: &mut Evaluation,
) -> std::result::Result<(), OracleError> {
    eval.state_before = oracle.current_facts()?;
    eval.state_after = eval.state_before.clone();

    if !oracle.is_known_action(action)? {
        eval.result = ValidationResult::InvalidAction;
        eval.explanation = EXPLAIN_INVALID_ACTION.to_string();
        return Ok(());
    }

    eval.preconditions = oracle.preconditions_of(action)?;

    let verdict = oracle.validate(action)?;
    eval.result = verdict.into();
    eval.explanation = match verdict {
        OracleVerdict::Valid => EXPLAIN_VALID.to_string(),
        OracleVerdict::InvalidAction => EXPLAIN_INVALID_ACTION.to_string(),
        OracleVerdict::PreconditionFailed => {
            // Only the explanation depends on this query; a failure here
            // does not change the verdict.
            match oracle.missing_preconditions(action) {
                Ok(missing) => {
                    eval.missing = missing;
                    missing_explanation(&eval.missing)
                }
                Err(err) => {
                    tracing::warn!("Missing-precondition query failed for '{}': {}", action, err);
                    missing_explanation(&[])
                }
            }
        }
    };

    eval.state_after = oracle.current_facts()?;
    Ok(())
}
