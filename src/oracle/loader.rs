//! Load rule bases from TOML files
//!
//! ```toml
//! [initial]
//! facts = ["powered_off", "battery_full"]
//!
//! [[actions]]
//! name = "poweron"
//! preconditions = ["powered_off"]
//! removes = ["powered_off"]
//! adds = ["powered_on"]
//! ```

use crate::core::error::{Result, VerifierError};
use crate::core::types::Action;
use crate::oracle::rules::{ActionRule, RuleBase};
use std::fs;
use std::path::Path;

/// Load a rule base from a TOML file
pub fn load_rule_base(path: &Path) -> Result<RuleBase> {
    let content = fs::read_to_string(path).map_err(|e| {
        VerifierError::RuleBase(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let base = parse_rule_base(&content)?;
    tracing::info!(
        "Loaded {} action rules from {}",
        base.len(),
        path.display()
    );
    Ok(base)
}

/// Parse a rule base from a TOML string
pub fn parse_rule_base(content: &str) -> Result<RuleBase> {
    let toml: toml::Value = content
        .parse()
        .map_err(|e| VerifierError::RuleBase(format!("Invalid TOML: {}", e)))?;

    let initial = match toml.get("initial").and_then(|v| v.get("facts")) {
        Some(value) => string_list(value, "initial.facts").map_err(VerifierError::RuleBase)?,
        None => Vec::new(),
    };

    let mut base = RuleBase::new(initial);

    if let Some(actions) = toml.get("actions") {
        let actions = actions
            .as_array()
            .ok_or_else(|| VerifierError::RuleBase("'actions' must be an array of tables".into()))?;
        for action in actions {
            let rule = parse_action_rule(action).map_err(VerifierError::RuleBase)?;
            base.insert(rule).map_err(VerifierError::RuleBase)?;
        }
    }

    Ok(base)
}

fn parse_action_rule(value: &toml::Value) -> std::result::Result<ActionRule, String> {
    let name = value
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or("Action rule missing 'name'")?;

    let field = |key: &str| -> std::result::Result<Vec<String>, String> {
        match value.get(key) {
            Some(v) => string_list(v, &format!("{}.{}", name, key)),
            None => Ok(Vec::new()),
        }
    };

    Ok(ActionRule {
        name: Action::new(name),
        preconditions: field("preconditions")?,
        adds: field("adds")?,
        removes: field("removes")?,
    })
}

fn string_list(value: &toml::Value, context: &str) -> std::result::Result<Vec<String>, String> {
    let items = value
        .as_array()
        .ok_or_else(|| format!("'{}' must be an array of strings", context))?;

    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(|s| s.trim().to_string())
                .ok_or_else(|| format!("'{}' contains a non-string entry", context))
        })
        .collect()
}
