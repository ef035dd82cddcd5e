//! PlantCycle Firmware — Main Entry Point
//!
//! Wires the concrete ESP-IDF drivers into the cycle controller and hands
//! control to its never-returning main loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  Dht11 (SensorPort)   FourWireStepper (StepperPort)            │
//! │  PumpPin (Dispenser)  Watchdog (TWDT)   SystemClock (sleep)    │
//! │  ConsoleDisplay       LogEventSink                             │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            CycleController (pure logic)                │    │
//! │  │  FSM · DecisionPolicy · PositionActuator · SleepTimer  │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```

use anyhow::{Context, Result};
use esp_idf_hal::delay::Ets;
use esp_idf_hal::gpio::{AnyIOPin, AnyOutputPin, PinDriver};
use log::{info, warn};

use plantcycle::adapters::clock::SystemClock;
use plantcycle::adapters::display::ConsoleDisplay;
use plantcycle::adapters::log_sink::LogEventSink;
use plantcycle::app::controller::{Board, CycleController};
use plantcycle::config::SystemConfig;
use plantcycle::diagnostics::{self, ResetReason};
use plantcycle::drivers::pump::PumpPin;
use plantcycle::drivers::stepper::FourWireStepper;
use plantcycle::drivers::watchdog::Watchdog;
use plantcycle::error::Error;
use plantcycle::pins;
use plantcycle::sensors::dht11::Dht11;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  PlantCycle v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    ResetReason::read().log();
    diagnostics::install_panic_handler();

    // ── 2. Configuration ──────────────────────────────────────
    let config = SystemConfig::default();

    // ── 3. Peripherals ────────────────────────────────────────
    //
    // SAFETY: every GPIO number comes from `pins` and is claimed exactly
    // once here; nothing else in the firmware drives these pins except
    // the panic hook, which only runs after the controller has stopped.
    let mut coils = Vec::with_capacity(4);
    for gpio in pins::STEPPER_COIL_ORDER {
        let pin = PinDriver::output(unsafe { AnyOutputPin::new(gpio) })
            .with_context(|| format!("stepper coil GPIO{gpio}"))?;
        coils.push(pin);
    }
    let coils: [_; 4] = coils
        .try_into()
        .map_err(|_| Error::Init("stepper needs exactly 4 coils"))?;

    let pump = PinDriver::output(unsafe { AnyOutputPin::new(pins::PUMP_GPIO) })
        .context("pump GPIO")?;
    let dht = PinDriver::input_output_od(unsafe { AnyIOPin::new(pins::DHT_GPIO) })
        .context("DHT11 GPIO")?;

    let board = Board {
        sensor: Dht11::new(dht, Ets),
        stepper: FourWireStepper::new(coils, Ets, config.step_interval_us()),
        pump: PumpPin::new(pump),
        watchdog: Watchdog::new(),
        clock: SystemClock::new(),
        display: ConsoleDisplay::new(),
    };

    // ── 4. Control loop ───────────────────────────────────────
    let mut controller = CycleController::new(config, board)?;
    match serde_json::to_string(controller.config()) {
        Ok(json) => info!("Config: {}", json),
        Err(e) => warn!("Config not serialisable: {}", e),
    }

    let mut sink = LogEventSink::new();
    controller.start(&mut sink);
    controller.run(&mut sink)
}
