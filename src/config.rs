//! System configuration parameters
//!
//! All tunable parameters for the PlantCycle controller.  Configuration is
//! fixed at build time: [`SystemConfig::default`] carries the shipped
//! values and [`SystemConfig::validate`] runs before the controller is
//! constructed, so a mis-sized target table or an unsupervisable wait can
//! never reach the field.

use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Maximum number of watering targets the selector can be configured with.
pub const MAX_TARGETS: usize = 8;

/// Human-readable target label.  Longer labels are truncated.
pub type Label = heapless::String<12>;

/// One watering destination on the selector axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub label: Label,
    /// Absolute selector position in steps from home.
    pub position: i32,
    /// How long the pump runs once the selector is in place.
    pub dispense_ms: u32,
}

impl Target {
    /// Build a target, truncating `label` to [`Label`] capacity.
    pub fn new(label: &str, position: i32, dispense_ms: u32) -> Self {
        let mut l = Label::new();
        for c in label.chars() {
            if l.push(c).is_err() {
                break;
            }
        }
        Self {
            label: l,
            position,
            dispense_ms,
        }
    }
}

/// Timings for the per-cycle wiring check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelfTestConfig {
    /// Position the selector visits to prove the motor moves.
    pub probe_position: i32,
    /// Position the selector returns to after the probe.
    pub home_position: i32,
    /// How long each self-test banner stays on the display.
    pub display_hold_ms: u32,
    /// Settle time after each selector move.
    pub settle_ms: u32,
    /// Duration of the pump blip.
    pub pump_pulse_ms: u32,
    /// Rest after the pump blip.
    pub pump_rest_ms: u32,
}

impl Default for SelfTestConfig {
    fn default() -> Self {
        Self {
            probe_position: 50,
            home_position: 0,
            display_hold_ms: 2000,
            settle_ms: 1000,
            pump_pulse_ms: 2000,
            pump_rest_ms: 1000,
        }
    }
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Decision ---
    /// Water only while relative humidity is strictly below this (%).
    pub humidity_below_pct: f32,
    /// Water only while temperature is strictly above this (°C).
    pub temperature_above_c: f32,

    // --- Cycle timing ---
    /// Sleep between cycles (milliseconds).
    pub cycle_interval_ms: u32,
    /// Sleep after a failed sensor read (milliseconds).
    pub sensor_fault_sleep_ms: u32,
    /// Length of one supervised sleep sub-cycle (milliseconds).
    pub sleep_quantum_ms: u32,
    /// Hardware watchdog timeout (milliseconds).
    pub watchdog_timeout_ms: u32,

    // --- Watering ---
    /// Targets in visiting order.
    pub targets: Vec<Target, MAX_TARGETS>,
    /// Pause between consecutive targets (milliseconds).
    pub inter_target_pause_ms: u32,

    // --- Selector axis ---
    /// Lowest reachable selector position (steps).
    pub min_position: i32,
    /// Highest reachable selector position (steps).
    pub max_position: i32,
    /// Full steps per motor revolution.
    pub steps_per_rev: u16,
    /// Selector speed (revolutions per minute).
    pub motor_rpm: u16,

    // --- Self-test ---
    pub self_test: SelfTestConfig,

    // --- Status display ---
    /// `System Init` banner duration at boot.
    pub splash_hold_ms: u32,
    /// `Ready` banner duration at boot.
    pub ready_hold_ms: u32,
    /// `Sensor error!` banner duration before the fallback sleep.
    pub sensor_error_hold_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        let mut targets = Vec::new();
        // Capacity is MAX_TARGETS; two pushes cannot overflow.
        let _ = targets.push(Target::new("Plant A", 0, 5000));
        let _ = targets.push(Target::new("Plant B", 100, 5000));

        Self {
            // Decision
            humidity_below_pct: 50.0,
            temperature_above_c: 15.0,

            // Cycle timing
            cycle_interval_ms: 600_000,     // 10 min
            sensor_fault_sleep_ms: 600_000, // 10 min
            sleep_quantum_ms: 8000,
            watchdog_timeout_ms: 10_000,

            // Watering
            targets,
            inter_target_pause_ms: 2000,

            // Selector axis
            min_position: 0,
            max_position: 200,
            steps_per_rev: 200,
            motor_rpm: 60,

            self_test: SelfTestConfig::default(),

            // Status display
            splash_hold_ms: 2000,
            ready_hold_ms: 1000,
            sensor_error_hold_ms: 2000,
        }
    }
}

impl SystemConfig {
    /// Minimum interval between step pulses implied by speed and resolution.
    pub fn step_interval_us(&self) -> u32 {
        let steps_per_min = u32::from(self.steps_per_rev) * u32::from(self.motor_rpm);
        if steps_per_min == 0 {
            return u32::MAX;
        }
        60_000_000 / steps_per_min
    }

    /// Worst-case duration of a single selector move (end to end).
    pub fn max_move_ms(&self) -> u64 {
        let span = u64::from(self.max_position.abs_diff(self.min_position));
        span * u64::from(self.step_interval_us()) / 1000
    }

    /// Reject configurations the control loop cannot run safely.
    ///
    /// Every blocking wait outside the sleep timer must fit inside one
    /// sleep quantum, so the watchdog is fed at least once per quantum
    /// whether the device is sleeping or not.
    pub fn validate(&self) -> Result<()> {
        if self.targets.is_empty() {
            return Err(Error::Config("empty target list"));
        }
        if self.min_position > self.max_position {
            return Err(Error::Config("min_position above max_position"));
        }
        if self.steps_per_rev == 0 || self.motor_rpm == 0 {
            return Err(Error::Config("motor speed must be non-zero"));
        }

        let in_range = |p: i32| (self.min_position..=self.max_position).contains(&p);
        if !self.targets.iter().all(|t| in_range(t.position)) {
            return Err(Error::Config("target position outside axis range"));
        }
        if !in_range(self.self_test.probe_position) || !in_range(self.self_test.home_position) {
            return Err(Error::Config("self-test position outside axis range"));
        }

        if self.sleep_quantum_ms == 0 {
            return Err(Error::Config("sleep quantum must be non-zero"));
        }
        if self.cycle_interval_ms < self.sleep_quantum_ms {
            return Err(Error::Config("cycle interval shorter than one sleep quantum"));
        }
        if self.sensor_fault_sleep_ms < self.sleep_quantum_ms {
            return Err(Error::Config("fault sleep shorter than one sleep quantum"));
        }
        if self.watchdog_timeout_ms <= self.sleep_quantum_ms {
            return Err(Error::Config("watchdog timeout must exceed the sleep quantum"));
        }

        let limit = self.sleep_quantum_ms;
        if self.targets.iter().any(|t| t.dispense_ms > limit) {
            return Err(Error::Config("dispense duration exceeds sleep quantum"));
        }
        let st = &self.self_test;
        let holds = [
            self.inter_target_pause_ms,
            self.splash_hold_ms,
            self.ready_hold_ms,
            self.sensor_error_hold_ms,
            st.display_hold_ms,
            st.settle_ms,
            st.pump_pulse_ms,
            st.pump_rest_ms,
        ];
        if holds.iter().any(|&ms| ms > limit) {
            return Err(Error::Config("blocking hold exceeds sleep quantum"));
        }
        if self.max_move_ms() > u64::from(limit) {
            return Err(Error::Config("full-range selector move exceeds sleep quantum"));
        }

        Ok(())
    }
}
