//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Agent position on the dead-reckoning plane
pub type Position = geo::Point<f64>;

/// A normalized symbolic action token (trimmed, lowercased)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Action(String);

impl Action {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Action {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl PartialEq<str> for Action {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Action {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// One entry of an incoming action list
///
/// Non-string entries are kept as-is so the engine can report them as
/// `InvalidFormat` steps in their original position.
#[derive(Debug, Clone, PartialEq)]
pub enum RawAction {
    Token(Action),
    Malformed(serde_json::Value),
}

impl RawAction {
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => RawAction::Token(Action::new(s)),
            other => RawAction::Malformed(other.clone()),
        }
    }

    /// The normalized token, if this entry is well-formed
    pub fn action(&self) -> Option<&Action> {
        match self {
            RawAction::Token(action) => Some(action),
            RawAction::Malformed(_) => None,
        }
    }

    /// Check whether this entry is the given action
    pub fn is(&self, name: &str) -> bool {
        self.action().is_some_and(|a| a == name)
    }

    /// Name used in step records
    pub fn display_name(&self) -> String {
        match self {
            RawAction::Token(action) => action.to_string(),
            RawAction::Malformed(value) => value.to_string(),
        }
    }
}

impl From<&str> for RawAction {
    fn from(raw: &str) -> Self {
        RawAction::Token(Action::new(raw))
    }
}
