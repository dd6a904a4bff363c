//! Mode controller
//!
//! Holds the Add/Remove mode for the session. Toggling the mode also clears
//! the debouncer so a product scanned moments ago under the old mode takes
//! effect straight away under the new one.

use super::debounce::ScanDebouncer;
use super::types::Mode;

#[derive(Debug, Clone, Default)]
pub struct ModeController {
    mode: Mode,
}

impl ModeController {
    pub fn new(mode: Mode) -> Self {
        Self { mode }
    }

    pub fn current_mode(&self) -> Mode {
        self.mode
    }

    /// Toggle Add <-> Remove and reset `debouncer`. Returns the new mode.
    pub fn switch_mode(&mut self, debouncer: &mut ScanDebouncer) -> Mode {
        self.mode = self.mode.toggled();
        debouncer.clear();
        log::info!("Mode set to {}", self.mode.label());
        self.mode
    }
}
