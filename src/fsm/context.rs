//! Per-cycle context threaded through every phase handler.
//!
//! `CycleContext` holds the outcome of the current cycle only.  It is wiped
//! on every entry to `Testing`, so nothing observed in one cycle can leak
//! into the next and a reboot is indistinguishable from a normal cycle
//! boundary.

use crate::config::SystemConfig;
use crate::sensors::Reading;

pub struct CycleContext {
    /// 1-based index of the current cycle since boot.
    pub cycle: u64,
    /// This cycle's sample, once Sampling has run.
    pub reading: Option<Reading>,
    /// True once Sampling produced an invalid reading.
    pub sensor_fault: bool,
    /// Outcome of Deciding.
    pub water: bool,
    /// Duration the Sleeping phase will request.
    pub sleep_ms: u32,

    cycle_interval_ms: u32,
    sensor_fault_sleep_ms: u32,
}

impl CycleContext {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            cycle: 0,
            reading: None,
            sensor_fault: false,
            water: false,
            sleep_ms: config.cycle_interval_ms,
            cycle_interval_ms: config.cycle_interval_ms,
            sensor_fault_sleep_ms: config.sensor_fault_sleep_ms,
        }
    }

    /// Reset to the state every cycle starts from.
    pub fn begin_cycle(&mut self) {
        self.cycle += 1;
        self.reading = None;
        self.sensor_fault = false;
        self.water = false;
        self.sleep_ms = self.cycle_interval_ms;
    }

    /// Switch this cycle onto the measurement-failure path.
    pub fn mark_sensor_fault(&mut self) {
        self.sensor_fault = true;
        self.water = false;
        self.sleep_ms = self.sensor_fault_sleep_ms;
    }

    /// This cycle's reading, if it is present and valid.
    pub fn valid_reading(&self) -> Option<Reading> {
        self.reading.filter(Reading::is_valid)
    }
}
