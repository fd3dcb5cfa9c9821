//! End-to-end verification scenarios against the robot rule base

use std::cell::Cell;

use geo::Point;
use sequence_verifier::oracle::{FactSet, OracleError, OracleVerdict, RuleBaseOracle, WorldStateOracle};
use sequence_verifier::report::SUMMARY_INVALID;
use sequence_verifier::{
    Action, RawAction, ValidationResult, VerificationEngine, VerificationInput, VerificationReport,
    VerifierConfig, VerifierError,
};
use serde_json::json;

fn verify(input: &VerificationInput) -> VerificationReport {
    let config = VerifierConfig::default();
    let mut oracle = RuleBaseOracle::robot();
    VerificationEngine::new(&config)
        .verify_input(&mut oracle, input)
        .expect("verification should run")
}

#[test]
fn test_pickup_sequence_without_expansion() {
    let input = VerificationInput::from_names(&["poweron", "scanarea", "moveforward", "pickobject"])
        .with_auto_expand(false);
    let report = verify(&input);

    assert!(report.is_valid());
    assert_eq!(report.summary, "VALID SEQUENCE");
    assert_eq!(report.summary_details, "All 4 actions are valid.");
    assert_eq!(report.battery_history, [100, 90, 70, 60]);
    assert_eq!(report.final_battery, 60);
    assert!(report.final_state.contains("holding_object"));
    assert!(report
        .validation
        .iter()
        .all(|entry| entry.explanation == "All preconditions satisfied."));

    // reset, on, on+scanned, on+scanned+holding; moveforward changes nothing
    assert_eq!(report.fsm.nodes.len(), 4);
    assert_eq!(report.fsm.edges.len(), 4);
    assert_eq!(report.fsm.edges[2].from, report.fsm.edges[2].to);
}

#[test]
fn test_unknown_action() {
    let report = verify(&VerificationInput::from_names(&["flyaway"]));

    assert_eq!(report.validation[0].result, ValidationResult::InvalidAction);
    assert_eq!(report.validation[0].battery, 100);
    assert_eq!(report.final_battery, 100);
    assert_eq!(report.summary, SUMMARY_INVALID);
    assert_eq!(report.summary_details, "Found 1 invalid action(s) out of 1.");
}

#[test]
fn test_manual_target_expansion() {
    let input = VerificationInput::from_names(&["moveforward", "pickobject"])
        .with_targets(vec![Point::new(5.0, 4.0)]);
    let report = verify(&input);

    assert_eq!(
        report.expanded_actions,
        [
            "moveforward",
            "moveright",
            "moveright",
            "moveright",
            "moveforward",
            "pickobject"
        ]
    );
    // Robot is still powered off, so every step fails but all are recorded.
    assert_eq!(report.validation.len(), 6);
    assert_eq!(report.battery_history.len(), 6);
    assert!(!report.is_valid());
}

#[test]
fn test_non_string_action() {
    let input = VerificationInput::from_json(&json!({ "actions": [42] })).unwrap();
    let report = verify(&input);

    let entry = &report.validation[0];
    assert_eq!(entry.result, ValidationResult::InvalidFormat);
    assert_eq!(entry.action, "42");
    assert_eq!(entry.battery, 100);
    assert_eq!(entry.from_state, entry.to_state);
    assert!(!report.is_valid());
}

#[test]
fn test_missing_preconditions_reported_in_order() {
    let report = verify(&VerificationInput::from_names(&["poweron", "pickobject"]));
    let entry = &report.validation[1];

    assert_eq!(entry.result, ValidationResult::PreconditionFailed);
    assert_eq!(entry.precondition, "powered_on, area_scanned, object_detected");
    assert_eq!(entry.missing, ["area_scanned"]);
    assert_eq!(entry.explanation, "Missing preconditions: area_scanned");
    assert!(!entry.precondition_met);
}

#[test]
fn test_replay_is_deterministic() {
    let input = VerificationInput::from_names(&[
        "poweron",
        "scanarea",
        "pickobject",
        "flyaway",
        "releaseobject",
        "poweroff",
        "poweron",
    ])
    .with_targets(vec![Point::new(2.0, 3.0)]);

    let config = VerifierConfig::default();
    let engine = VerificationEngine::new(&config);

    // Same oracle instance reused: reset must wipe the previous run.
    let mut oracle = RuleBaseOracle::robot();
    let first = engine.verify_input(&mut oracle, &input).unwrap();
    let second = engine.verify_input(&mut oracle, &input).unwrap();

    assert_eq!(first, second);
}

/// Robot oracle that fails selected queries
struct FlakyOracle {
    inner: RuleBaseOracle,
    fail_reset: bool,
    fail_known: Option<&'static str>,
    fail_validate: Option<&'static str>,
    fail_missing: bool,
    /// 1-based `current_facts` call that fails
    fail_facts_call: Option<usize>,
    facts_calls: Cell<usize>,
    validate_calls: usize,
}

impl FlakyOracle {
    fn robot() -> Self {
        Self {
            inner: RuleBaseOracle::robot(),
            fail_reset: false,
            fail_known: None,
            fail_validate: None,
            fail_missing: false,
            fail_facts_call: None,
            facts_calls: Cell::new(0),
            validate_calls: 0,
        }
    }

    fn down(query: &str) -> OracleError {
        OracleError::query_failed(query, "backend down")
    }
}

impl WorldStateOracle for FlakyOracle {
    fn reset(&mut self) -> Result<(), OracleError> {
        if self.fail_reset {
            return Err(Self::down("reset"));
        }
        self.inner.reset()
    }

    fn is_known_action(&self, action: &Action) -> Result<bool, OracleError> {
        if self.fail_known.is_some_and(|name| action == name) {
            return Err(Self::down("is_known_action"));
        }
        self.inner.is_known_action(action)
    }

    fn preconditions_of(&self, action: &Action) -> Result<Vec<String>, OracleError> {
        self.inner.preconditions_of(action)
    }

    fn missing_preconditions(&self, action: &Action) -> Result<Vec<String>, OracleError> {
        if self.fail_missing {
            return Err(Self::down("missing_preconditions"));
        }
        self.inner.missing_preconditions(action)
    }

    fn validate(&mut self, action: &Action) -> Result<OracleVerdict, OracleError> {
        self.validate_calls += 1;
        if self.fail_validate.is_some_and(|name| action == name) {
            return Err(Self::down("validate"));
        }
        self.inner.validate(action)
    }

    fn current_facts(&self) -> Result<FactSet, OracleError> {
        let call = self.facts_calls.get() + 1;
        self.facts_calls.set(call);
        if self.fail_facts_call == Some(call) {
            return Err(Self::down("current_facts"));
        }
        self.inner.current_facts()
    }
}

fn verify_with(oracle: &mut FlakyOracle, names: &[&str]) -> Result<VerificationReport, VerifierError> {
    let config = VerifierConfig::default();
    let actions: Vec<RawAction> = names.iter().map(|n| RawAction::from(*n)).collect();
    VerificationEngine::new(&config).verify(oracle, &actions, &[], false)
}

fn results(report: &VerificationReport) -> Vec<ValidationResult> {
    report.validation.iter().map(|e| e.result).collect()
}

fn initial_facts() -> FactSet {
    FactSet::from_facts(["powered_off", "battery_full", "object_detected"])
}

#[test]
fn test_oracle_failure_becomes_error_processing() {
    let mut oracle = FlakyOracle::robot();
    oracle.fail_validate = Some("scanarea");

    let report = verify_with(&mut oracle, &["poweron", "scanarea", "checkbattery"]).unwrap();

    assert_eq!(
        results(&report),
        [
            ValidationResult::Valid,
            ValidationResult::ErrorProcessing,
            ValidationResult::Valid
        ]
    );
    assert_eq!(
        report.validation[1].explanation,
        "Internal error while querying the oracle."
    );
    // No drain for the failed step.
    assert_eq!(report.battery_history, [100, 100, 100]);
    assert!(!report.is_valid());
}

#[test]
fn test_missing_query_failure_keeps_verdict() {
    let mut oracle = FlakyOracle::robot();
    oracle.fail_missing = true;

    let report = verify_with(&mut oracle, &["scanarea"]).unwrap();

    let entry = &report.validation[0];
    assert_eq!(entry.result, ValidationResult::PreconditionFailed);
    assert_eq!(entry.explanation, "One or more preconditions are not satisfied.");
    assert!(entry.missing.is_empty());
}

#[test]
fn test_reset_failure_aborts_before_any_step() {
    let mut oracle = FlakyOracle::robot();
    oracle.fail_reset = true;

    let result = verify_with(&mut oracle, &["poweron", "scanarea"]);

    assert!(matches!(result, Err(VerifierError::Oracle(_))));
    assert_eq!(oracle.validate_calls, 0);
}

#[test]
fn test_known_action_failure_becomes_error_processing() {
    let mut oracle = FlakyOracle::robot();
    oracle.fail_known = Some("scanarea");

    let report = verify_with(&mut oracle, &["poweron", "scanarea", "checkbattery"]).unwrap();

    assert_eq!(
        results(&report),
        [
            ValidationResult::Valid,
            ValidationResult::ErrorProcessing,
            ValidationResult::Valid
        ]
    );
    let failed = &report.validation[1];
    assert_eq!(failed.precondition, "none");
    assert_eq!(failed.from_state, failed.to_state);
    assert!(!report.final_state.contains("area_scanned"));
}

#[test]
fn test_failed_before_snapshot_skips_the_oracle() {
    let mut oracle = FlakyOracle::robot();
    // call 1 is the reset snapshot, call 2 the first step's before-snapshot
    oracle.fail_facts_call = Some(2);

    let report = verify_with(&mut oracle, &["poweron"]).unwrap();

    assert_eq!(results(&report), [ValidationResult::ErrorProcessing]);
    assert_eq!(report.validation[0].from_state, initial_facts());
    assert_eq!(report.validation[0].to_state, initial_facts());
    assert_eq!(oracle.validate_calls, 0);
}

#[test]
fn test_failed_after_snapshot_falls_back_to_before() {
    let mut oracle = FlakyOracle::robot();
    // call 3 is the first step's after-snapshot
    oracle.fail_facts_call = Some(3);

    let report = verify_with(&mut oracle, &["poweron", "checkbattery"]).unwrap();

    assert_eq!(
        results(&report),
        [ValidationResult::ErrorProcessing, ValidationResult::Valid]
    );
    let first = &report.validation[0];
    assert_eq!(first.from_state, initial_facts());
    assert_eq!(first.to_state, initial_facts());
    assert_eq!(first.battery, 100);

    // poweron did take effect inside the oracle; the next step starts there
    // and its edge leaves from the node for that state.
    let second = &report.validation[1];
    assert!(second.from_state.contains("powered_on"));
    let edge = &report.fsm.edges[1];
    assert_eq!(report.fsm.nodes[edge.from].state, second.from_state);
    assert_eq!(report.fsm.nodes[edge.to].state, second.to_state);
}

#[test]
fn test_failed_final_snapshot_uses_last_step_state() {
    let mut oracle = FlakyOracle::robot();
    // reset, before, after, then the final-state query
    oracle.fail_facts_call = Some(4);

    let report = verify_with(&mut oracle, &["poweron"]).unwrap();

    assert!(report.is_valid());
    assert_eq!(report.final_state, report.validation[0].to_state);
    assert!(report.final_state.contains("powered_on"));
}

#[test]
fn test_bracketed_string_request() {
    let input = VerificationInput::from_json(&json!({
        "actions": "[PowerOn, ScanArea]",
        "autoExpand": false
    }))
    .unwrap();
    let report = verify(&input);

    assert!(report.is_valid());
    assert_eq!(report.expanded_actions, ["poweron", "scanarea"]);
    assert_eq!(report.final_battery, 90);
}
