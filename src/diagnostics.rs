//! Boot diagnostics and runtime counters.
//!
//! - [`ResetReason`] is read once at boot so a watchdog restart is visible
//!   in the log.
//! - [`install_panic_handler`] logs the panic and forces the pump pin low
//!   before the default handler resets the chip.
//! - [`CycleStats`] accumulates per-cycle counters and is logged after
//!   every cycle.

use serde::{Deserialize, Serialize};

use crate::app::controller::CycleReport;

// ───────────────────────────────────────────────────────────────
// Reset reason
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResetReason {
    PowerOn,
    Watchdog,
    Panic,
    Brownout,
    Software,
    DeepSleep,
    Other,
}

impl ResetReason {
    #[cfg(target_os = "espidf")]
    pub fn read() -> Self {
        use esp_idf_svc::sys::*;

        // SAFETY: reads a value latched by the ROM bootloader.
        match unsafe { esp_reset_reason() } {
            esp_reset_reason_t_ESP_RST_POWERON => Self::PowerOn,
            esp_reset_reason_t_ESP_RST_TASK_WDT
            | esp_reset_reason_t_ESP_RST_INT_WDT
            | esp_reset_reason_t_ESP_RST_WDT => Self::Watchdog,
            esp_reset_reason_t_ESP_RST_PANIC => Self::Panic,
            esp_reset_reason_t_ESP_RST_BROWNOUT => Self::Brownout,
            esp_reset_reason_t_ESP_RST_SW => Self::Software,
            esp_reset_reason_t_ESP_RST_DEEPSLEEP => Self::DeepSleep,
            _ => Self::Other,
        }
    }

    /// Host builds always look like a cold boot.
    #[cfg(not(target_os = "espidf"))]
    pub fn read() -> Self {
        Self::PowerOn
    }

    /// True when the previous run ended abnormally.
    pub fn is_fault(self) -> bool {
        matches!(self, Self::Watchdog | Self::Panic | Self::Brownout)
    }

    /// Log the reason at a level matching its severity.
    pub fn log(self) {
        if self.is_fault() {
            log::warn!("Boot: reset after {:?}", self);
        } else {
            log::info!("Boot: reset reason {:?}", self);
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Cycle counters
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleStats {
    pub cycles: u64,
    /// Cycles that reached Actuating.
    pub waterings: u64,
    pub sensor_faults: u64,
    /// Total steps issued to the selector since boot.
    pub steps_issued: u64,
    pub sub_cycles_slept: u64,
    /// FSM transitions since boot.
    pub phase_transitions: u64,
}

impl CycleStats {
    pub fn record_cycle(&mut self, report: &CycleReport, steps_issued: u64) {
        self.cycles += 1;
        if report.watered {
            self.waterings += 1;
        }
        if report.sensor_fault {
            self.sensor_faults += 1;
        }
        self.steps_issued = steps_issued;
        self.sub_cycles_slept += u64::from(report.sleep.sub_cycles);
    }

    pub fn log(&self) {
        log::info!(
            "Stats: cycles={} waterings={} faults={}",
            self.cycles,
            self.waterings,
            self.sensor_faults
        );
        log::debug!(
            "Stats: steps={} sub_cycles={} transitions={}",
            self.steps_issued,
            self.sub_cycles_slept,
            self.phase_transitions
        );
    }
}

// ───────────────────────────────────────────────────────────────
// Panic hook
// ───────────────────────────────────────────────────────────────

/// Install a panic hook that shuts the pump off before reset.
///
/// Call once during init.  The pin is written through the raw GPIO API
/// because the pump driver is owned by the controller that just panicked.
pub fn install_panic_handler() {
    std::panic::set_hook(Box::new(|info| {
        let reason = if let Some(msg) = info.payload().downcast_ref::<&str>() {
            *msg
        } else if let Some(msg) = info.payload().downcast_ref::<String>() {
            msg.as_str()
        } else {
            "unknown panic"
        };

        log::error!("PANIC: {}", reason);
        if let Some(loc) = info.location() {
            log::error!("  at {}:{}", loc.file(), loc.line());
        }

        #[cfg(target_os = "espidf")]
        {
            // SAFETY: a single register write, safe from panic context.
            let ret = unsafe { esp_idf_svc::sys::gpio_set_level(crate::pins::PUMP_GPIO, 0) };
            if ret != esp_idf_svc::sys::ESP_OK {
                log::error!("Panic handler: pump pin write failed ({})", ret);
            }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            log::error!("Pump forced off (simulation)");
        }
    }));
}
