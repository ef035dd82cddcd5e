//! Task Watchdog Timer (TWDT) driver.
//!
//! Wraps the ESP-IDF TWDT API behind [`WatchdogPort`].  Once armed, the
//! device panics (and resets) if the control task goes one full timeout
//! without calling `reset()`.
//!
//! On non-espidf targets the driver only counts calls.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use log::info;

use crate::app::ports::WatchdogPort;

#[derive(Default)]
pub struct Watchdog {
    armed: bool,
    #[cfg(not(target_os = "espidf"))]
    resets: u64,
}

impl Watchdog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }
}

#[cfg(target_os = "espidf")]
impl WatchdogPort for Watchdog {
    fn arm(&mut self, timeout_ms: u32) {
        // SAFETY: plain FFI calls with a stack-allocated config; only ever
        // invoked from the single control task.
        unsafe {
            let cfg = esp_task_wdt_config_t {
                timeout_ms,
                idle_core_mask: 0,
                trigger_panic: true,
            };
            let ret = esp_task_wdt_reconfigure(&cfg);
            if ret != ESP_OK {
                log::warn!("TWDT reconfigure returned {} (may not be initialised)", ret);
                let ret = esp_task_wdt_init(&cfg);
                if ret != ESP_OK {
                    log::warn!("TWDT init returned {}", ret);
                }
            }

            let ret = esp_task_wdt_add(core::ptr::null_mut());
            self.armed = ret == ESP_OK;
        }
        if self.armed {
            info!("Watchdog: armed ({}ms timeout, panic on trigger)", timeout_ms);
        } else {
            log::warn!("Watchdog: failed to subscribe control task");
        }
    }

    fn reset(&mut self) {
        if self.armed {
            // SAFETY: the current task is subscribed (armed == true).
            unsafe {
                esp_task_wdt_reset();
            }
        }
    }

    fn disarm(&mut self) {
        if self.armed {
            // SAFETY: removes the current task, which `arm` subscribed.
            unsafe {
                esp_task_wdt_delete(core::ptr::null_mut());
            }
            self.armed = false;
            info!("Watchdog: disarmed");
        }
    }
}

#[cfg(not(target_os = "espidf"))]
impl Watchdog {
    /// Number of `reset()` calls while armed.
    pub fn resets(&self) -> u64 {
        self.resets
    }
}

#[cfg(not(target_os = "espidf"))]
impl WatchdogPort for Watchdog {
    fn arm(&mut self, timeout_ms: u32) {
        info!("Watchdog(sim): armed ({}ms)", timeout_ms);
        self.armed = true;
    }

    fn reset(&mut self) {
        if self.armed {
            self.resets += 1;
        }
    }

    fn disarm(&mut self) {
        info!("Watchdog(sim): disarmed");
        self.armed = false;
    }
}
