//! Rule-table oracle evaluated in-process

use std::sync::Arc;

use crate::core::types::Action;
use crate::oracle::facts::FactSet;
use crate::oracle::rules::RuleBase;
use crate::oracle::{OracleError, OracleVerdict, WorldStateOracle};

/// Oracle backed by an immutable [`RuleBase`] and an owned fact set
///
/// The rule base is shared; the fact set belongs to this oracle alone, so
/// one oracle per run keeps runs isolated.
#[derive(Debug, Clone)]
pub struct RuleBaseOracle {
    rules: Arc<RuleBase>,
    facts: FactSet,
}

impl RuleBaseOracle {
    /// Create an oracle already in the reset state
    pub fn new(rules: Arc<RuleBase>) -> Self {
        let facts = FactSet::from_facts(rules.initial_facts().iter().cloned());
        Self { rules, facts }
    }

    /// Oracle over the reference robot rules
    pub fn robot() -> Self {
        Self::new(Arc::new(RuleBase::robot_defaults()))
    }
}

impl WorldStateOracle for RuleBaseOracle {
    fn reset(&mut self) -> Result<(), OracleError> {
        self.facts = FactSet::from_facts(self.rules.initial_facts().iter().cloned());
        Ok(())
    }

    fn is_known_action(&self, action: &Action) -> Result<bool, OracleError> {
        Ok(self.rules.contains(action))
    }

    fn preconditions_of(&self, action: &Action) -> Result<Vec<String>, OracleError> {
        Ok(self
            .rules
            .get(action)
            .map(|rule| rule.preconditions.clone())
            .unwrap_or_default())
    }

    fn missing_preconditions(&self, action: &Action) -> Result<Vec<String>, OracleError> {
        Ok(self
            .rules
            .get(action)
            .map(|rule| {
                rule.preconditions
                    .iter()
                    .filter(|fact| !self.facts.contains(fact))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn validate(&mut self, action: &Action) -> Result<OracleVerdict, OracleError> {
        let Some(rule) = self.rules.get(action) else {
            return Ok(OracleVerdict::InvalidAction);
        };

        if !rule.preconditions.iter().all(|fact| self.facts.contains(fact)) {
            return Ok(OracleVerdict::PreconditionFailed);
        }

        for fact in &rule.removes {
            self.facts.retract(fact);
        }
        for fact in &rule.adds {
            self.facts.assert(fact.as_str());
        }
        Ok(OracleVerdict::Valid)
    }

    fn current_facts(&self) -> Result<FactSet, OracleError> {
        Ok(self.facts.clone())
    }
}
