//! Control policy — the rule that turns a reading into a watering decision.

pub mod policy;
