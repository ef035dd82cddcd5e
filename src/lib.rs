//! PlantCycle firmware library.
//!
//! Exposes the control loop and its drivers for integration testing.
//! All ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module, so the whole library builds and tests on the host.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod control;
pub mod diagnostics;
pub mod error;
pub mod fsm;
pub mod pins;
pub mod power;

pub mod adapters;
pub mod drivers;
pub mod sensors;
