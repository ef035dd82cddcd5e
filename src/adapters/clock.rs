//! Platform clock adapter.
//!
//! Provides the two kinds of waiting the controller needs:
//!
//! - [`DelayNs`] for ordinary blocking holds (dispense windows, banners,
//!   self-test settle times).
//! - [`SleepPort`] for the between-cycle sub-cycles, which should cost as
//!   little power as the platform allows.
//!
//! - **`target_os = "espidf"`** — FreeRTOS task delays for millisecond
//!   holds, ROM busy-wait for sub-millisecond ones, and timer-woken light
//!   sleep for sub-cycles.
//! - **`not(target_os = "espidf")`** — `std::thread::sleep` for all three,
//!   for host-side simulation.

use embedded_hal::delay::DelayNs;

use crate::app::ports::SleepPort;

#[derive(Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(target_os = "espidf")]
impl DelayNs for SystemClock {
    fn delay_ns(&mut self, ns: u32) {
        if ns >= 1_000_000 {
            esp_idf_hal::delay::FreeRtos::delay_ms(ns / 1_000_000);
        } else {
            esp_idf_hal::delay::Ets::delay_us(ns.div_ceil(1000));
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        esp_idf_hal::delay::FreeRtos::delay_ms(ms);
    }
}

#[cfg(target_os = "espidf")]
impl SleepPort for SystemClock {
    fn sleep_ms(&mut self, ms: u32) {
        use esp_idf_svc::sys::{ESP_OK, esp_light_sleep_start, esp_sleep_enable_timer_wakeup};

        // SAFETY: both calls only touch the RTC sleep controller and are
        // issued from the single control task.
        let ret = unsafe {
            esp_sleep_enable_timer_wakeup(u64::from(ms) * 1000);
            esp_light_sleep_start()
        };
        if ret != ESP_OK {
            // Light sleep refused (e.g. a wake source is already pending):
            // fall back to an ordinary task delay so the duration still holds.
            log::debug!("Light sleep rejected (rc={}), delaying instead", ret);
            esp_idf_hal::delay::FreeRtos::delay_ms(ms);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
impl DelayNs for SystemClock {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }
}

#[cfg(not(target_os = "espidf"))]
impl SleepPort for SystemClock {
    fn sleep_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }
}
