//! Fact sets: the world state the oracle reasons over

use serde::{Deserialize, Serialize};

/// A set of fact atoms
///
/// Equality is set equality. Assertion order is kept only so snapshots read
/// the way the oracle produced them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactSet {
    facts: Vec<String>,
}

impl FactSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a fact set, dropping repeated atoms
    pub fn from_facts<I, S>(facts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::new();
        for fact in facts {
            set.assert(fact);
        }
        set
    }

    pub fn contains(&self, fact: &str) -> bool {
        self.facts.iter().any(|f| f == fact)
    }

    /// Add a fact; returns false if it already held
    pub fn assert(&mut self, fact: impl Into<String>) -> bool {
        let fact = fact.into();
        if self.contains(&fact) {
            return false;
        }
        self.facts.push(fact);
        true
    }

    /// Remove a fact; returns false if it did not hold
    pub fn retract(&mut self, fact: &str) -> bool {
        let before = self.facts.len();
        self.facts.retain(|f| f != fact);
        self.facts.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.facts.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.facts
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Sorted, deduplicated atoms; two sets are equal iff their keys are
    pub fn canonical_key(&self) -> Vec<String> {
        let mut key = self.facts.clone();
        key.sort();
        key.dedup();
        key
    }
}

impl PartialEq for FactSet {
    fn eq(&self, other: &Self) -> bool {
        self.canonical_key() == other.canonical_key()
    }
}

impl Eq for FactSet {}
