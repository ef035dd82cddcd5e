//! Outbound application events.
//!
//! The [`CycleController`](super::controller::CycleController) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on the
//! other side decide what to do with them.

use crate::config::Label;
use crate::fsm::Phase;
use crate::sensors::Reading;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Boot sequence finished; the watchdog is armed.
    Started,

    /// The cycle moved between phases.
    PhaseChanged { from: Phase, to: Phase },

    /// A valid climate sample was taken.
    ReadingTaken(Reading),

    /// The sensor returned an invalid sample; this cycle will not water.
    SensorFault,

    /// One target received its dose.
    TargetWatered {
        label: Label,
        position: i32,
        dispense_ms: u32,
    },

    /// The between-cycle sleep returned.
    Slept {
        requested_ms: u32,
        sub_cycles: u32,
    },

    /// A full cycle ended.
    CycleCompleted { cycle: u64, watered: bool },
}
