//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART / USB-CDC in production).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => {
                info!("START | watchdog armed, entering cycle loop");
            }
            AppEvent::PhaseChanged { from, to } => {
                info!("PHASE | {:?} -> {:?}", from, to);
            }
            AppEvent::ReadingTaken(r) => {
                info!(
                    "READ  | T={:.1}\u{00b0}C RH={:.1}%",
                    r.temperature_c, r.humidity_pct
                );
            }
            AppEvent::SensorFault => {
                warn!("FAULT | sensor returned an invalid reading");
            }
            AppEvent::TargetWatered {
                label,
                position,
                dispense_ms,
            } => {
                info!("WATER | {} @ {} for {}ms", label, position, dispense_ms);
            }
            AppEvent::Slept {
                requested_ms,
                sub_cycles,
            } => {
                info!("SLEEP | {}ms requested, {} sub-cycles", requested_ms, sub_cycles);
            }
            AppEvent::CycleCompleted { cycle, watered } => {
                info!("CYCLE | #{} done, watered={}", cycle, watered);
            }
        }
    }
}
