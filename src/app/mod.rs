//! Application core — pure cycle logic, zero I/O.
//!
//! The [`controller`] sequences self-test, sampling, decision, actuation
//! and sleep.  All interaction with hardware happens through the **port
//! traits** in [`ports`], keeping this layer fully testable without real
//! peripherals.

pub mod controller;
pub mod events;
pub mod ports;
