//! Selector axis: the position-owning actuator and the four-wire coil driver.
//!
//! [`PositionActuator`] is the only place the selector position lives.  It
//! has no feedback sensor: position is the net count of steps issued since
//! boot, starting from 0.  Steps are assumed lossless.
//!
//! [`FourWireStepper`] turns single `pulse_step` calls into the full-step
//! coil sequence for a unipolar motor behind a ULN2003 and enforces the
//! minimum step period with a blocking delay.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::{debug, warn};

use crate::app::ports::{StepDirection, StepperPort};
use crate::error::ActuatorError;

// ───────────────────────────────────────────────────────────────
// PositionActuator
// ───────────────────────────────────────────────────────────────

pub struct PositionActuator<M> {
    motor: M,
    position: i32,
    steps_issued: u64,
}

impl<M: StepperPort> PositionActuator<M> {
    /// Wrap a motor.  Whatever the physical selector is doing, this
    /// defines the current location as position 0.
    pub fn new(motor: M) -> Self {
        Self {
            motor,
            position: 0,
            steps_issued: 0,
        }
    }

    /// Drive to the absolute `target` and return the number of steps issued.
    ///
    /// Blocks for the whole move.  Moving to the current position issues
    /// nothing.
    pub fn move_to(&mut self, target: i32) -> u32 {
        let steps = target.abs_diff(self.position);
        let direction = if target > self.position {
            StepDirection::Forward
        } else {
            StepDirection::Reverse
        };

        for _ in 0..steps {
            self.motor.pulse_step(direction);
        }

        debug!(
            "Selector: {} -> {} ({} steps {:?})",
            self.position, target, steps, direction
        );
        self.position = target;
        self.steps_issued += u64::from(steps);
        steps
    }

    pub fn position(&self) -> i32 {
        self.position
    }

    /// Total steps issued since construction, in either direction.
    pub fn steps_issued(&self) -> u64 {
        self.steps_issued
    }

    pub fn motor(&self) -> &M {
        &self.motor
    }

    pub fn into_inner(self) -> M {
        self.motor
    }
}

// ───────────────────────────────────────────────────────────────
// FourWireStepper
// ───────────────────────────────────────────────────────────────

/// Full-step (two-phase-on) sequence, one row per phase, one column per
/// coil in wiring order.
const FULL_STEP: [[bool; 4]; 4] = [
    [true, false, true, false],
    [false, true, true, false],
    [false, true, false, true],
    [true, false, false, true],
];

pub struct FourWireStepper<P, D> {
    coils: [P; 4],
    delay: D,
    phase: usize,
    interval_us: u32,
}

impl<P: OutputPin, D: DelayNs> FourWireStepper<P, D> {
    /// `coils` must be in energising order (see `pins::STEPPER_COIL_ORDER`).
    pub fn new(coils: [P; 4], delay: D, interval_us: u32) -> Self {
        Self {
            coils,
            delay,
            phase: 0,
            interval_us,
        }
    }

    pub fn phase(&self) -> usize {
        self.phase
    }

    fn energise(&mut self) -> Result<(), ActuatorError> {
        let pattern = FULL_STEP[self.phase];
        for (coil, on) in self.coils.iter_mut().zip(pattern) {
            let r = if on { coil.set_high() } else { coil.set_low() };
            r.map_err(|_| ActuatorError::CoilWriteFailed)?;
        }
        Ok(())
    }
}

impl<P: OutputPin, D: DelayNs> StepperPort for FourWireStepper<P, D> {
    fn pulse_step(&mut self, direction: StepDirection) {
        self.phase = match direction {
            StepDirection::Forward => (self.phase + 1) % FULL_STEP.len(),
            StepDirection::Reverse => (self.phase + FULL_STEP.len() - 1) % FULL_STEP.len(),
        };
        if let Err(e) = self.energise() {
            warn!("Stepper: {e}");
        }
        self.delay.delay_us(self.interval_us);
    }
}
