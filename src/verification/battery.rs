//! Battery tracking across a run

use crate::core::config::BatteryConfig;
use crate::core::types::Action;
use crate::verification::step::ValidationResult;

/// Battery level plus its per-step history
///
/// The level only ever decreases, and only for valid steps.
#[derive(Debug, Clone)]
pub struct BatteryMeter<'a> {
    config: &'a BatteryConfig,
    level: u8,
    history: Vec<u8>,
}

impl<'a> BatteryMeter<'a> {
    pub fn new(config: &'a BatteryConfig) -> Self {
        Self {
            config,
            level: config.initial.min(100),
            history: Vec::new(),
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn history(&self) -> &[u8] {
        &self.history
    }

    /// Drain charged for a successful `action`
    pub fn drain_for(&self, action: &Action) -> u8 {
        self.config
            .drain
            .get(action.as_str())
            .copied()
            .unwrap_or(0)
    }

    /// Account for one processed step and return the new level
    pub fn record(&mut self, action: Option<&Action>, result: ValidationResult) -> u8 {
        if let (Some(action), true) = (action, result.is_valid()) {
            self.level = self.level.saturating_sub(self.drain_for(action));
        }
        self.history.push(self.level);
        self.level
    }

    pub fn into_history(self) -> Vec<u8> {
        self.history
    }
}
