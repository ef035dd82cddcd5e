//! Console-backed status display.
//!
//! Renders each screen as one log line, clipped to the geometry of the
//! 16x2 character LCD the firmware was designed around.  A board without
//! an LCD gets the same status text on the serial console.

use log::info;

use crate::app::ports::DisplayPort;
use crate::error::Error;

pub const LCD_COLUMNS: usize = 16;
pub const LCD_ROWS: usize = 2;

/// One rendered screen, rows joined by ` | `.
type Screen = heapless::String<{ LCD_ROWS * (LCD_COLUMNS + 3) }>;

#[derive(Default)]
pub struct ConsoleDisplay {
    last: Screen,
}

impl ConsoleDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently shown screen.
    pub fn last_screen(&self) -> &str {
        &self.last
    }
}

impl DisplayPort for ConsoleDisplay {
    /// Shows at most [`LCD_ROWS`] rows of [`LCD_COLUMNS`] characters.
    /// Extra rows are dropped and reported as an error.
    fn show(&mut self, lines: &[&str]) -> Result<(), Error> {
        self.last.clear();
        for (i, line) in lines.iter().take(LCD_ROWS).enumerate() {
            if i > 0 {
                self.last.push_str(" | ").map_err(|_| Error::Display)?;
            }
            for c in line.chars().take(LCD_COLUMNS) {
                self.last.push(c).map_err(|_| Error::Display)?;
            }
        }
        info!("LCD   | {}", self.last);

        if lines.len() > LCD_ROWS {
            return Err(Error::Display);
        }
        Ok(())
    }
}
