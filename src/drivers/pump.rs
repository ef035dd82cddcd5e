//! Water pump driver (single enable pin through a transistor).
//!
//! [`Dispenser`] is the controller-facing actuator; [`PumpPin`] is the raw
//! output behind it.
//!
//! ## Safety contract
//!
//! The output must be off before and after every dispense window.  The
//! cycle controller enforces this; the driver is a dumb actuator and keeps
//! no state beyond the pin itself.

use embedded_hal::digital::OutputPin;
use log::{info, warn};

use crate::app::ports::DispenserPort;
use crate::error::ActuatorError;

/// Controller-facing on/off wrapper around a [`DispenserPort`].
pub struct Dispenser<P> {
    output: P,
}

impl<P: DispenserPort> Dispenser<P> {
    pub fn new(output: P) -> Self {
        Self { output }
    }

    pub fn set_on(&mut self) {
        info!("Pump: ON");
        self.output.set_output(true);
    }

    pub fn set_off(&mut self) {
        info!("Pump: OFF");
        self.output.set_output(false);
    }

    pub fn output(&self) -> &P {
        &self.output
    }

    pub fn into_inner(self) -> P {
        self.output
    }
}

/// Active-high pump enable pin.
pub struct PumpPin<O> {
    pin: O,
}

impl<O: OutputPin> PumpPin<O> {
    /// Takes the pin and drives it low before returning.
    pub fn new(pin: O) -> Self {
        let mut p = Self { pin };
        p.set_output(false);
        p
    }
}

impl<O: OutputPin> DispenserPort for PumpPin<O> {
    fn set_output(&mut self, on: bool) {
        let r = if on { self.pin.set_high() } else { self.pin.set_low() };
        if r.is_err() {
            warn!("Pump: {}", ActuatorError::PumpWriteFailed);
        }
    }
}
