//! DHT11 single-wire temperature / humidity sensor.
//!
//! The host pulls the open-drain data line low for ≥18 ms, releases it, and
//! the sensor answers with an 80 µs low / 80 µs high preamble followed by
//! 40 data bits.  Every bit starts with ~50 µs low; the length of the
//! following high pulse encodes the value (~27 µs = 0, ~70 µs = 1).
//!
//! Pulse widths are measured by polling with 1 µs delays, so the counts
//! are approximate.  The 0/1 split sits well between the two nominal widths.
//!
//! ## Failure contract
//!
//! Any protocol failure is logged and reported to the controller as
//! [`Reading::invalid`].  The controller never sees the error itself.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use log::warn;

use super::Reading;
use crate::app::ports::SensorPort;
use crate::error::SensorError;

/// Start-signal low time (ms).
const START_LOW_MS: u32 = 18;
/// Upper bound on any single protocol phase (µs).
const EDGE_TIMEOUT_US: u32 = 100;
/// High-pulse width separating a 0 bit from a 1 bit (µs).
const ONE_THRESHOLD_US: u32 = 40;

pub struct Dht11<P, D> {
    pin: P,
    delay: D,
}

impl<P, D> Dht11<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    /// The pin must already be configured as open-drain with a pull-up.
    pub fn new(pin: P, delay: D) -> Self {
        Self { pin, delay }
    }

    /// Run one full transaction and decode it.
    pub fn read(&mut self) -> Result<Reading, SensorError> {
        self.pin.set_low().map_err(|_| SensorError::Gpio)?;
        self.delay.delay_ms(START_LOW_MS);
        self.pin.set_high().map_err(|_| SensorError::Gpio)?;

        // Sensor acknowledges by pulling low, then high, then low again.
        self.wait_for(false).map_err(|_| SensorError::NoResponse)?;
        self.wait_for(true)?;
        self.wait_for(false)?;

        let mut frame = [0u8; 5];
        for byte in &mut frame {
            for _ in 0..8 {
                self.wait_for(true)?;
                let high_us = self.wait_for(false)?;
                *byte = (*byte << 1) | u8::from(high_us > ONE_THRESHOLD_US);
            }
        }

        decode_frame(frame)
    }

    /// Poll until the line reaches `high`.  Returns the time spent waiting.
    fn wait_for(&mut self, high: bool) -> Result<u32, SensorError> {
        for elapsed in 0..=EDGE_TIMEOUT_US {
            let level = self.pin.is_high().map_err(|_| SensorError::Gpio)?;
            if level == high {
                return Ok(elapsed);
            }
            self.delay.delay_us(1);
        }
        Err(SensorError::Timeout)
    }
}

impl<P, D> SensorPort for Dht11<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    fn sample(&mut self) -> Reading {
        match self.read() {
            Ok(r) => r,
            Err(e) => {
                warn!("DHT11: read failed ({e})");
                Reading::invalid()
            }
        }
    }
}

/// Convert a raw 5-byte frame (RH int, RH dec, T int, T dec, checksum).
pub fn decode_frame(frame: [u8; 5]) -> Result<Reading, SensorError> {
    let sum = frame[..4].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    if sum != frame[4] {
        return Err(SensorError::Checksum);
    }

    let humidity = f32::from(frame[0]) + f32::from(frame[1]) / 10.0;
    let mut temperature = f32::from(frame[2]) + f32::from(frame[3] & 0x7f) / 10.0;
    if frame[3] & 0x80 != 0 {
        temperature = -temperature;
    }

    Ok(Reading::new(temperature, humidity))
}
