//! Request parsing: loosely-typed JSON into verification input
//!
//! `actions` may be a JSON array (non-string entries survive as malformed
//! steps) or a single string such as `"[poweron, scanarea]"`. Anything else,
//! or a missing `actions` field, rejects the whole request.

use geo::Point;
use serde::Deserialize;
use serde_json::Value;

use crate::core::error::{Result, VerifierError};
use crate::core::types::{Position, RawAction};

/// A manual target coordinate as accepted on the wire
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TargetInput {
    Pair([f64; 2]),
    Point { x: f64, y: f64 },
}

impl From<TargetInput> for Position {
    fn from(target: TargetInput) -> Self {
        match target {
            TargetInput::Pair([x, y]) | TargetInput::Point { x, y } => Point::new(x, y),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireRequest {
    #[serde(default)]
    actions: Option<Value>,
    #[serde(default, alias = "manualTargets")]
    manual_targets: Vec<TargetInput>,
    #[serde(default = "default_auto_expand", alias = "autoExpand")]
    auto_expand: bool,
}

fn default_auto_expand() -> bool {
    true
}

/// Validated input for one verification run
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationInput {
    pub actions: Vec<RawAction>,
    pub targets: Vec<Position>,
    pub auto_expand: bool,
}

impl VerificationInput {
    pub fn new(actions: Vec<RawAction>) -> Self {
        Self {
            actions,
            targets: Vec::new(),
            auto_expand: true,
        }
    }

    /// Convenience constructor from plain action names
    pub fn from_names(names: &[&str]) -> Self {
        Self::new(names.iter().map(|n| RawAction::from(*n)).collect())
    }

    pub fn with_targets(mut self, targets: Vec<Position>) -> Self {
        self.targets = targets;
        self
    }

    pub fn with_auto_expand(mut self, auto_expand: bool) -> Self {
        self.auto_expand = auto_expand;
        self
    }

    /// Parse a request body
    pub fn from_json(body: &Value) -> Result<Self> {
        if !body.is_object() {
            return Err(reject("Request body must be a JSON object"));
        }

        let wire: WireRequest = serde_json::from_value(body.clone())
            .map_err(|e| reject(&format!("Malformed request: {}", e)))?;

        let actions = match wire.actions {
            None | Some(Value::Null) => return Err(reject("Missing 'actions' in request")),
            Some(Value::Array(items)) => items.iter().map(RawAction::from_json).collect(),
            Some(Value::String(list)) => parse_action_list(&list),
            Some(_) => return Err(reject("Actions must be a list")),
        };

        Ok(Self {
            actions,
            targets: wire.manual_targets.into_iter().map(Position::from).collect(),
            auto_expand: wire.auto_expand,
        })
    }

    /// Parse a request body from text
    pub fn from_json_str(body: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| reject(&format!("Request is not valid JSON: {}", e)))?;
        Self::from_json(&value)
    }
}

fn reject(message: &str) -> VerifierError {
    tracing::warn!("Rejected verification request: {}", message);
    VerifierError::InvalidFormat(message.to_string())
}

/// Split `"[a, 'b', \"c\"]"` into normalized tokens
///
/// Either bracket is optional; empty entries are dropped.
pub fn parse_action_list(list: &str) -> Vec<RawAction> {
    let trimmed = list.trim();
    let inner = trimmed.strip_prefix('[').unwrap_or(trimmed);
    let inner = inner.strip_suffix(']').unwrap_or(inner);

    inner
        .split(',')
        .map(|item| item.trim().trim_matches(&['"', '\''][..]).trim())
        .filter(|item| !item.is_empty())
        .map(RawAction::from)
        .collect()
}
