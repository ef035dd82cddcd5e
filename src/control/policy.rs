//! Watering decision policy
//!
//! A single conjunctive threshold on the current reading: water when the
//! air is dry enough *and* warm enough.  No hysteresis, no averaging, no
//! per-target thresholds.  Invalid readings never reach this function; the
//! controller routes them to its error path first.

use crate::config::SystemConfig;
use crate::sensors::Reading;

/// Thresholds for the watering decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionPolicy {
    /// Water only while humidity is strictly below this (%).
    pub humidity_below_pct: f32,
    /// Water only while temperature is strictly above this (°C).
    pub temperature_above_c: f32,
}

impl DecisionPolicy {
    pub fn new(humidity_below_pct: f32, temperature_above_c: f32) -> Self {
        Self {
            humidity_below_pct,
            temperature_above_c,
        }
    }

    pub fn from_config(config: &SystemConfig) -> Self {
        Self::new(config.humidity_below_pct, config.temperature_above_c)
    }

    /// Pure function of the reading.
    pub fn should_water(&self, reading: &Reading) -> bool {
        reading.humidity_pct < self.humidity_below_pct
            && reading.temperature_c > self.temperature_above_c
    }
}
