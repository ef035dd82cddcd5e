//! Watchdog-supervised low-power sleep.
//!
//! A long sleep is never one long wait.  [`SleepTimer::sleep`] breaks it
//! into whole sub-cycles of one quantum each and resets the watchdog before
//! every sub-cycle, so the watchdog keeps supervising the device while it
//! sleeps and a hung wake-up still ends in a reset.
//!
//! The part of a request that does not fill a whole quantum is dropped:
//! `sleep(8500)` with an 8000 ms quantum sleeps 8000 ms.  Requests shorter
//! than one quantum return immediately.

use log::debug;

use crate::app::ports::{SleepPort, WatchdogPort};

/// One decomposed sleep call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SleepRequest {
    pub requested_ms: u32,
    pub quantum_ms: u32,
    pub sub_cycles: u32,
}

impl SleepRequest {
    pub fn new(requested_ms: u32, quantum_ms: u32) -> Self {
        let sub_cycles = requested_ms.checked_div(quantum_ms).unwrap_or(0);
        Self {
            requested_ms,
            quantum_ms,
            sub_cycles,
        }
    }

    /// Time actually spent asleep.
    pub fn slept_ms(&self) -> u64 {
        u64::from(self.sub_cycles) * u64::from(self.quantum_ms)
    }

    /// Truncated remainder that is not slept.
    pub fn dropped_ms(&self) -> u32 {
        self.requested_ms.checked_rem(self.quantum_ms).unwrap_or(self.requested_ms)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SleepTimer {
    quantum_ms: u32,
}

impl SleepTimer {
    pub fn new(quantum_ms: u32) -> Self {
        Self { quantum_ms }
    }

    pub fn quantum_ms(&self) -> u32 {
        self.quantum_ms
    }

    /// Sleep for `duration_ms` rounded down to whole quanta.  Blocks until
    /// done; nothing but a hardware reset can interrupt it.
    pub fn sleep(
        &self,
        duration_ms: u32,
        watchdog: &mut impl WatchdogPort,
        wait: &mut impl SleepPort,
    ) -> SleepRequest {
        let request = SleepRequest::new(duration_ms, self.quantum_ms);
        if request.dropped_ms() > 0 {
            debug!(
                "Sleep: {}ms requested, {}ms remainder dropped",
                duration_ms,
                request.dropped_ms()
            );
        }

        let mut remaining = request.sub_cycles;
        while remaining > 0 {
            watchdog.reset();
            wait.sleep_ms(self.quantum_ms);
            remaining -= 1;
        }

        request
    }
}
