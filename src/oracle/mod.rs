//! World-state oracle: the precondition/effect decision procedure
//!
//! The verification engine only ever talks to the oracle through the narrow
//! [`WorldStateOracle`] trait. The crate ships one implementation,
//! [`RuleBaseOracle`], which evaluates an embedded table of action rules; any
//! other backend (an external reasoner behind a call boundary, a recorded
//! fixture) only needs to honour the same contract.

pub mod embedded;
pub mod facts;
pub mod loader;
pub mod rules;

pub use embedded::RuleBaseOracle;
pub use facts::FactSet;
pub use loader::{load_rule_base, parse_rule_base};
pub use rules::{ActionRule, RuleBase};

use crate::core::types::Action;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure raised by an oracle query
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OracleError {
    #[error("oracle query '{query}' failed: {reason}")]
    QueryFailed { query: String, reason: String },
}

impl OracleError {
    pub fn query_failed(query: impl Into<String>, reason: impl Into<String>) -> Self {
        OracleError::QueryFailed {
            query: query.into(),
            reason: reason.into(),
        }
    }
}

/// Outcome of asking the oracle to validate one action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OracleVerdict {
    Valid,
    PreconditionFailed,
    InvalidAction,
}

/// Precondition/effect decision procedure over a mutable fact set
///
/// `validate` is the only mutating query: a `Valid` verdict also applies the
/// action's effects. All other queries observe the current facts.
pub trait WorldStateOracle {
    /// Restore the canonical initial fact set
    fn reset(&mut self) -> Result<(), OracleError>;

    fn is_known_action(&self, action: &Action) -> Result<bool, OracleError>;

    /// Preconditions of `action` in oracle-defined order
    fn preconditions_of(&self, action: &Action) -> Result<Vec<String>, OracleError>;

    /// Preconditions of `action` that do not currently hold
    fn missing_preconditions(&self, action: &Action) -> Result<Vec<String>, OracleError>;

    fn validate(&mut self, action: &Action) -> Result<OracleVerdict, OracleError>;

    /// Snapshot of the current fact set
    fn current_facts(&self) -> Result<FactSet, OracleError>;
}
