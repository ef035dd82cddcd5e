//! Unified error types for the PlantCycle firmware.
//!
//! The control loop itself recognises exactly one runtime failure (an
//! invalid sensor reading), and that one never travels as an `Error`: it
//! is folded into [`Reading`](crate::sensors::Reading) validity.  The
//! variants here cover driver-internal faults that are logged and absorbed
//! at the port boundary, plus configuration and init failures that stop
//! the firmware before the first cycle.
//! All variants are `Copy` so drivers can hand them around without
//! allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The climate sensor could not produce a reading.
    Sensor(SensorError),
    /// An actuator pin write failed.
    Actuator(ActuatorError),
    /// The status display rejected a write.
    Display,
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Build-time configuration failed validation.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Display => write!(f, "display write failed"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The sensor never pulled the line low after the start signal.
    NoResponse,
    /// A bit edge did not arrive inside the protocol window.
    Timeout,
    /// The frame checksum did not match its payload.
    Checksum,
    /// A data-line pin read or write failed.
    Gpio,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoResponse => write!(f, "no response"),
            Self::Timeout => write!(f, "bit timeout"),
            Self::Checksum => write!(f, "checksum mismatch"),
            Self::Gpio => write!(f, "GPIO access failed"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// A stepper coil write failed.
    CoilWriteFailed,
    /// The pump enable pin write failed.
    PumpWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CoilWriteFailed => write!(f, "stepper coil write failed"),
            Self::PumpWriteFailed => write!(f, "pump pin write failed"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
