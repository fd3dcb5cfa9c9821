//! Action rule definitions and storage

use crate::core::types::Action;
use ahash::AHashMap;

/// Preconditions and effects of a single action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRule {
    pub name: Action,
    pub preconditions: Vec<String>,
    pub adds: Vec<String>,
    pub removes: Vec<String>,
}

impl ActionRule {
    pub fn new(name: &str) -> Self {
        Self {
            name: Action::new(name),
            preconditions: Vec::new(),
            adds: Vec::new(),
            removes: Vec::new(),
        }
    }

    pub fn requires<I: IntoIterator<Item = &'static str>>(mut self, facts: I) -> Self {
        self.preconditions.extend(facts.into_iter().map(String::from));
        self
    }

    pub fn adds<I: IntoIterator<Item = &'static str>>(mut self, facts: I) -> Self {
        self.adds.extend(facts.into_iter().map(String::from));
        self
    }

    pub fn removes<I: IntoIterator<Item = &'static str>>(mut self, facts: I) -> Self {
        self.removes.extend(facts.into_iter().map(String::from));
        self
    }
}

/// The knowledge base: initial facts plus one rule per known action
#[derive(Debug, Clone, Default)]
pub struct RuleBase {
    initial_facts: Vec<String>,
    rules: AHashMap<Action, ActionRule>,
}

impl RuleBase {
    pub fn new<I, S>(initial_facts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            initial_facts: initial_facts.into_iter().map(Into::into).collect(),
            rules: AHashMap::new(),
        }
    }

    /// The rule base for the reference robot: power, scanning, movement and
    /// object handling
    pub fn robot_defaults() -> Self {
        let mut base = Self::new(["powered_off", "battery_full", "object_detected"]);

        let rules = [
            ActionRule::new("poweron")
                .requires(["powered_off"])
                .removes(["powered_off"])
                .adds(["powered_on"]),
            ActionRule::new("poweroff")
                .requires(["powered_on"])
                .removes(["powered_on", "area_scanned"])
                .adds(["powered_off"]),
            ActionRule::new("checkbattery")
                .requires(["powered_on"])
                .adds(["battery_checked"]),
            ActionRule::new("scanarea")
                .requires(["powered_on"])
                .adds(["area_scanned"]),
            ActionRule::new("moveforward").requires(["powered_on", "battery_full"]),
            ActionRule::new("moveleft").requires(["powered_on", "battery_full"]),
            ActionRule::new("moveright").requires(["powered_on", "battery_full"]),
            ActionRule::new("turnleft").requires(["powered_on"]),
            ActionRule::new("turnright").requires(["powered_on"]),
            ActionRule::new("pickobject")
                .requires(["powered_on", "area_scanned", "object_detected"])
                .removes(["object_detected"])
                .adds(["holding_object"]),
            ActionRule::new("releaseobject")
                .requires(["powered_on", "holding_object"])
                .removes(["holding_object"])
                .adds(["object_released"]),
            ActionRule::new("stop").requires(["powered_on"]).adds(["stopped"]),
        ];

        for rule in rules {
            base.rules.insert(rule.name.clone(), rule);
        }
        base
    }

    /// Add a rule; rejects a second rule for the same action
    pub fn insert(&mut self, rule: ActionRule) -> Result<(), String> {
        if rule.name.as_str().is_empty() {
            return Err("Action rule with empty name".into());
        }
        if self.rules.contains_key(&rule.name) {
            return Err(format!("Duplicate rule for action '{}'", rule.name));
        }
        self.rules.insert(rule.name.clone(), rule);
        Ok(())
    }

    pub fn get(&self, action: &Action) -> Option<&ActionRule> {
        self.rules.get(action)
    }

    pub fn contains(&self, action: &Action) -> bool {
        self.rules.contains_key(action)
    }

    pub fn initial_facts(&self) -> &[String] {
        &self.initial_facts
    }

    /// Known action names, sorted
    pub fn action_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(Action::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
