//! Climate sensing — the [`Reading`] value type and the DHT11 driver.
//!
//! A reading is produced fresh every cycle and consumed immediately; it is
//! never cached.  Sensor failures are encoded in the reading itself (NaN
//! fields) rather than as an error, so the controller sees one type with a
//! validity check instead of a fallible call.

pub mod dht11;

/// One temperature / humidity sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub temperature_c: f32,
    pub humidity_pct: f32,
}

impl Reading {
    pub const fn new(temperature_c: f32, humidity_pct: f32) -> Self {
        Self {
            temperature_c,
            humidity_pct,
        }
    }

    /// The reading a sensor reports when it could not measure.
    pub const fn invalid() -> Self {
        Self {
            temperature_c: f32::NAN,
            humidity_pct: f32::NAN,
        }
    }

    /// False when either measurement is NaN.
    pub fn is_valid(&self) -> bool {
        !self.temperature_c.is_nan() && !self.humidity_pct.is_nan()
    }
}
