//! Verifier configuration with documented constants
//!
//! The expansion heuristic and the battery model are driven entirely by the
//! values collected here. Every field has a default, so a TOML file only needs
//! to name what it overrides.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::core::error::{Result, VerifierError};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Movement insertion before pickup actions
    #[serde(default)]
    pub expansion: ExpansionConfig,
    /// Battery start level and drain table
    #[serde(default)]
    pub battery: BatteryConfig,
    /// Request boundary settings
    #[serde(default)]
    pub service: ServiceConfig,
}

/// Dead-reckoning parameters for the sequence expander
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionConfig {
    // === GEOMETRY ===
    /// Distance covered by one movement action (world units)
    ///
    /// moveforward adds this to y, moveleft/moveright subtract/add it on x.
    /// At most `2 * arrival_tolerance`, so a step cannot overshoot arrival.
    pub step_size: f64,

    /// Gap on an axis above which movement is inserted at all
    pub alignment_threshold: f64,

    /// Residual gap at which insertion on an axis stops early
    ///
    /// Must be >= alignment_threshold, otherwise a single step can overshoot
    /// into a gap that immediately re-triggers insertion.
    pub arrival_tolerance: f64,

    /// Hard cap on inserted steps per axis per pickup
    ///
    /// Targets further away than `max_steps_per_axis * step_size` are
    /// approached but never reached.
    pub max_steps_per_axis: usize,

    /// Forward steps appended after a scan when no manual target is left
    pub legacy_approach_steps: usize,

    /// Starting position of the agent
    pub origin: [f64; 2],

    // === ACTION NAMES ===
    /// Action that triggers insertion in front of it
    pub pickup_action: String,
    /// Action that enables the legacy approach when no target is available
    pub scan_action: String,
    pub forward_action: String,
    pub left_action: String,
    pub right_action: String,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            step_size: 1.5,
            alignment_threshold: 0.5,
            arrival_tolerance: 1.0,
            max_steps_per_axis: 5,
            legacy_approach_steps: 2,
            origin: [0.0, 0.0],
            pickup_action: "pickobject".into(),
            scan_action: "scanarea".into(),
            forward_action: "moveforward".into(),
            left_action: "moveleft".into(),
            right_action: "moveright".into(),
        }
    }
}

/// Battery model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatteryConfig {
    /// Level at the start of every run (percent)
    pub initial: u8,
    /// Drain per successfully validated action; unlisted actions cost nothing
    pub drain: AHashMap<String, u8>,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        let mut drain = AHashMap::new();
        for action in ["moveforward", "moveleft", "moveright", "turnleft", "turnright"] {
            drain.insert(action.to_string(), 20);
        }
        for action in ["scanarea", "pickobject", "releaseobject"] {
            drain.insert(action.to_string(), 10);
        }
        for action in ["poweron", "poweroff", "checkbattery", "stop"] {
            drain.insert(action.to_string(), 0);
        }
        Self { initial: 100, drain }
    }
}

/// Request boundary settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Upper bound on one verification run (milliseconds)
    pub run_timeout_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            run_timeout_ms: 5_000,
        }
    }
}

impl ServiceConfig {
    pub fn run_timeout(&self) -> Duration {
        Duration::from_millis(self.run_timeout_ms)
    }
}

impl VerifierConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate a config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            VerifierError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a config from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: VerifierConfig = toml::from_str(content)
            .map_err(|e| VerifierError::Config(format!("Invalid TOML: {}", e)))?;
        config.validate().map_err(VerifierError::Config)?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        let exp = &self.expansion;

        if exp.step_size.is_nan() || exp.step_size <= 0.0 {
            return Err(format!("step_size ({}) must be positive", exp.step_size));
        }

        if exp.alignment_threshold < 0.0 {
            return Err(format!(
                "alignment_threshold ({}) must not be negative",
                exp.alignment_threshold
            ));
        }

        if exp.arrival_tolerance < exp.alignment_threshold {
            return Err(format!(
                "arrival_tolerance ({}) should be >= alignment_threshold ({})",
                exp.arrival_tolerance, exp.alignment_threshold
            ));
        }

        // A longer step can jump over the arrival window and keep going.
        if exp.step_size > 2.0 * exp.arrival_tolerance {
            return Err(format!(
                "step_size ({}) must not exceed twice arrival_tolerance ({})",
                exp.step_size, exp.arrival_tolerance
            ));
        }

        if self.battery.initial > 100 {
            return Err(format!(
                "initial battery ({}) must be within 0..=100",
                self.battery.initial
            ));
        }

        if self.service.run_timeout_ms == 0 {
            return Err("run_timeout_ms must be positive".into());
        }

        Ok(())
    }
}
