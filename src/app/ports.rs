//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ CycleController (domain)
//! ```
//!
//! Driven adapters (sensor, stepper, pump, watchdog, display, clock, event
//! sinks) implement these traits.  The
//! [`CycleController`](super::controller::CycleController) consumes them via
//! generics, so the domain core never touches hardware directly.
//!
//! Ordinary blocking waits use [`embedded_hal::delay::DelayNs`]; only the
//! between-cycle sleep goes through [`SleepPort`].
//!
//! Apart from [`DisplayPort`], none of these calls can fail from the
//! controller's point of view.  Adapters log and absorb their own faults.

use crate::sensors::Reading;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: one climate sample per call.
pub trait SensorPort {
    /// Take a fresh sample.  A failed measurement returns
    /// [`Reading::invalid`], never a stale value.
    fn sample(&mut self) -> Reading;
}

// ───────────────────────────────────────────────────────────────
// Actuator ports (driven adapters: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Rotation sense of one selector step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    /// Towards higher positions.
    Forward,
    /// Towards lower positions.
    Reverse,
}

/// Raw stepper primitive.
///
/// Each call issues exactly one step and returns no earlier than the
/// motor's minimum step period, so back-to-back calls are always safe.
pub trait StepperPort {
    fn pulse_step(&mut self, direction: StepDirection);
}

/// Raw dispenser output (pump enable).
pub trait DispenserPort {
    fn set_output(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Liveness supervisor
// ───────────────────────────────────────────────────────────────

/// Hardware watchdog abstraction.  Once armed, the device resets unless
/// [`reset`](Self::reset) is called at least once per timeout.
pub trait WatchdogPort {
    fn arm(&mut self, timeout_ms: u32);
    fn reset(&mut self);
    fn disarm(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Low-power wait
// ───────────────────────────────────────────────────────────────

/// Block the single thread of control for `ms` in the lowest-power state
/// the platform offers.  Returns after the full duration.
pub trait SleepPort {
    fn sleep_ms(&mut self, ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Display port (best-effort status output)
// ───────────────────────────────────────────────────────────────

/// Human-readable status surface (character LCD, serial console, ...).
///
/// Each call replaces the whole screen.  Errors are reported so the caller
/// can log them, but they never change control flow.
pub trait DisplayPort {
    fn show(&mut self, lines: &[&str]) -> Result<(), crate::error::Error>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
