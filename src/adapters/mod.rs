//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements          | Connects to                  |
//! |------------|---------------------|------------------------------|
//! | `clock`    | DelayNs, SleepPort  | FreeRTOS delay / light sleep |
//! | `display`  | DisplayPort         | 16x2 character screen (log)  |
//! | `log_sink` | EventSink           | Serial log output            |

pub mod clock;
pub mod display;
pub mod log_sink;
