//! Actuator drivers and the task watchdog.

pub mod pump;
pub mod stepper;
pub mod watchdog;
