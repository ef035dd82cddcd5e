//! Cycle controller — the hexagonal core.
//!
//! [`CycleController`] owns the phase FSM, the selector position, and the
//! per-cycle context.  Every side effect goes through a port trait supplied
//! in a [`Board`], so the whole loop runs against mock hardware in tests.
//!
//! ```text
//!  SensorPort  ──▶ ┌──────────────────────────┐ ──▶ StepperPort
//!                  │     CycleController      │ ──▶ DispenserPort
//!  WatchdogPort ◀──│  FSM · Policy · Selector │ ──▶ DisplayPort
//!  clock (wait) ◀──│  SleepTimer · Stats      │ ──▶ EventSink
//!                  └──────────────────────────┘
//! ```
//!
//! ## Liveness
//!
//! The watchdog is reset at every phase boundary, before every selector
//! move, and before every blocking hold.  Config validation guarantees no
//! single move or hold outlasts one sleep quantum, and the sleep timer
//! resets it once per sub-cycle.  A hang anywhere else ends in a reset,
//! which restarts the firmware at a fresh `Testing` phase.

use core::fmt::Write;

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::config::SystemConfig;
use crate::control::policy::DecisionPolicy;
use crate::diagnostics::CycleStats;
use crate::drivers::pump::Dispenser;
use crate::drivers::stepper::PositionActuator;
use crate::error::Result;
use crate::fsm::context::CycleContext;
use crate::fsm::states::build_phase_table;
use crate::fsm::{Fsm, Phase};
use crate::power::{SleepRequest, SleepTimer};
use crate::sensors::Reading;

use super::events::AppEvent;
use super::ports::{
    DispenserPort, DisplayPort, EventSink, SensorPort, SleepPort, StepperPort, WatchdogPort,
};

// ───────────────────────────────────────────────────────────────
// Board — the bundle of ports the controller drives
// ───────────────────────────────────────────────────────────────

pub struct Board<S, M, P, W, C, D> {
    pub sensor: S,
    pub stepper: M,
    pub pump: P,
    pub watchdog: W,
    pub clock: C,
    pub display: D,
}

/// What one cycle did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleReport {
    pub cycle: u64,
    pub reading: Option<Reading>,
    pub sensor_fault: bool,
    pub watered: bool,
    pub sleep: SleepRequest,
}

// ───────────────────────────────────────────────────────────────
// CycleController
// ───────────────────────────────────────────────────────────────

pub struct CycleController<S, M, P, W, C, D> {
    config: SystemConfig,
    policy: DecisionPolicy,
    sleeper: SleepTimer,
    fsm: Fsm,
    ctx: CycleContext,
    stats: CycleStats,
    started: bool,

    sensor: S,
    selector: PositionActuator<M>,
    dispenser: Dispenser<P>,
    watchdog: W,
    clock: C,
    display: D,
}

impl<S, M, P, W, C, D> CycleController<S, M, P, W, C, D>
where
    S: SensorPort,
    M: StepperPort,
    P: DispenserPort,
    W: WatchdogPort,
    C: DelayNs + SleepPort,
    D: DisplayPort,
{
    /// Validate `config` and take ownership of the board.
    ///
    /// Does **not** touch hardware — call [`start`](Self::start) or go
    /// straight to [`run_cycle`](Self::run_cycle).
    pub fn new(config: SystemConfig, board: Board<S, M, P, W, C, D>) -> Result<Self> {
        config.validate()?;

        let ctx = CycleContext::new(&config);
        Ok(Self {
            policy: DecisionPolicy::from_config(&config),
            sleeper: SleepTimer::new(config.sleep_quantum_ms),
            fsm: Fsm::new(build_phase_table(), Phase::Testing),
            ctx,
            stats: CycleStats::default(),
            started: false,
            sensor: board.sensor,
            selector: PositionActuator::new(board.stepper),
            dispenser: Dispenser::new(board.pump),
            watchdog: board.watchdog,
            clock: board.clock,
            display: board.display,
            config,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// One-time boot sequence: pump off, splash banners, arm the watchdog.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        if self.started {
            return;
        }
        self.dispenser.set_off();

        self.show(&["System Init"]);
        self.hold(self.config.splash_hold_ms);
        self.show(&["Ready"]);
        self.hold(self.config.ready_hold_ms);

        self.watchdog.arm(self.config.watchdog_timeout_ms);
        self.fsm.start(&mut self.ctx);
        self.started = true;

        sink.emit(&AppEvent::Started);
        info!(
            "Controller started: {} targets, {}ms cycle, {}ms quantum",
            self.config.targets.len(),
            self.config.cycle_interval_ms,
            self.config.sleep_quantum_ms
        );
    }

    /// Run one full cycle, from `Testing` through `Sleeping`.
    pub fn run_cycle(&mut self, sink: &mut impl EventSink) -> CycleReport {
        self.start(sink);

        let mut report = CycleReport {
            cycle: self.ctx.cycle,
            reading: None,
            sensor_fault: false,
            watered: false,
            sleep: SleepRequest::new(0, self.sleeper.quantum_ms()),
        };

        loop {
            let phase = self.fsm.current_phase();
            self.watchdog.reset();
            self.run_phase(phase, &mut report, sink);

            let next = self.fsm.advance(&mut self.ctx);
            sink.emit(&AppEvent::PhaseChanged {
                from: phase,
                to: next,
            });
            if next == Phase::Testing {
                break;
            }
        }

        self.stats.record_cycle(&report, self.selector.steps_issued());
        self.stats.phase_transitions = self.fsm.transitions();
        sink.emit(&AppEvent::CycleCompleted {
            cycle: report.cycle,
            watered: report.watered,
        });
        self.stats.log();
        report
    }

    /// The firmware main loop.  Never returns.
    pub fn run(&mut self, sink: &mut impl EventSink) -> ! {
        loop {
            self.run_cycle(sink);
        }
    }

    /// Stop supervising and hand the hardware back, pump off.
    pub fn into_board(mut self) -> Board<S, M, P, W, C, D> {
        self.dispenser.set_off();
        self.watchdog.disarm();
        Board {
            sensor: self.sensor,
            stepper: self.selector.into_inner(),
            pump: self.dispenser.into_inner(),
            watchdog: self.watchdog,
            clock: self.clock,
            display: self.display,
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.fsm.current_phase()
    }

    /// Current selector position (steps from home).
    pub fn position(&self) -> i32 {
        self.selector.position()
    }

    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    // ── Phase actions ─────────────────────────────────────────

    fn run_phase(&mut self, phase: Phase, report: &mut CycleReport, sink: &mut impl EventSink) {
        match phase {
            Phase::Testing => self.self_test(),
            Phase::Sampling => {
                let reading = self.sensor.sample();
                self.ctx.reading = Some(reading);
                report.reading = Some(reading);
                if reading.is_valid() {
                    self.show_reading(&reading);
                    sink.emit(&AppEvent::ReadingTaken(reading));
                }
            }
            Phase::Error => {
                report.sensor_fault = true;
                sink.emit(&AppEvent::SensorFault);
                self.show(&["Sensor error!"]);
                self.hold(self.config.sensor_error_hold_ms);
            }
            Phase::Deciding => {
                self.ctx.water = self
                    .ctx
                    .valid_reading()
                    .is_some_and(|r| self.policy.should_water(&r));
                info!("Decision: water={}", self.ctx.water);
            }
            Phase::Actuating => {
                self.water_targets(sink);
                report.watered = true;
            }
            Phase::Sleeping => {
                let requested_ms = self.ctx.sleep_ms;
                info!("Sleeping {}ms", requested_ms);
                report.sleep = self
                    .sleeper
                    .sleep(requested_ms, &mut self.watchdog, &mut self.clock);
                sink.emit(&AppEvent::Slept {
                    requested_ms,
                    sub_cycles: report.sleep.sub_cycles,
                });
            }
        }
    }

    /// Wiring check: exercise the display, the selector, and the pump.
    /// Nothing is measured; a broken part is only visible to an observer.
    fn self_test(&mut self) {
        let st = self.config.self_test.clone();

        self.show(&["Testing LCD"]);
        self.hold(st.display_hold_ms);

        self.show(&["Testing Stepper"]);
        self.move_selector(st.probe_position);
        self.hold(st.settle_ms);
        self.move_selector(st.home_position);
        self.hold(st.settle_ms);

        self.show(&["Testing Pump"]);
        self.dispenser.set_on();
        self.hold(st.pump_pulse_ms);
        self.dispenser.set_off();
        self.hold(st.pump_rest_ms);

        self.show(&["Tests Complete"]);
        self.hold(st.display_hold_ms);
    }

    /// Visit every target in configured order and dispense.
    fn water_targets(&mut self, sink: &mut impl EventSink) {
        let targets = self.config.targets.clone();

        for (i, target) in targets.iter().enumerate() {
            if i > 0 {
                self.hold(self.config.inter_target_pause_ms);
            }

            let mut banner: heapless::String<32> = heapless::String::new();
            let _ = write!(banner, "Watering {}", target.label);
            self.show(&[banner.as_str()]);

            self.move_selector(target.position);
            self.dispenser.set_on();
            self.hold(target.dispense_ms);
            self.dispenser.set_off();

            sink.emit(&AppEvent::TargetWatered {
                label: target.label.clone(),
                position: target.position,
                dispense_ms: target.dispense_ms,
            });
        }
    }

    // ── Helpers ───────────────────────────────────────────────

    fn move_selector(&mut self, position: i32) {
        self.watchdog.reset();
        self.selector.move_to(position);
    }

    /// Blocking wait that starts with a fresh watchdog period.
    fn hold(&mut self, ms: u32) {
        self.watchdog.reset();
        self.clock.delay_ms(ms);
    }

    /// Best-effort display write; failures are logged and ignored.
    fn show(&mut self, lines: &[&str]) {
        if let Err(e) = self.display.show(lines) {
            warn!("Display: {e}");
        }
    }

    fn show_reading(&mut self, reading: &Reading) {
        let mut temp: heapless::String<32> = heapless::String::new();
        let mut hum: heapless::String<32> = heapless::String::new();
        let _ = write!(temp, "Temp: {:.2} C", reading.temperature_c);
        let _ = write!(hum, "Humidity: {:.2} %", reading.humidity_pct);
        self.show(&[temp.as_str(), hum.as_str()]);
    }
}
