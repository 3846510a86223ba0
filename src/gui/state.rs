//! # GUI State Management
//!
//! Front-end-only state that does not belong to the panel itself: the
//! contents of the "n=" tick entry box and the message shown when that
//! entry cannot be parsed.

use crate::panel::{parse_tick_entry, try_parse_tick_entry};

/// GUI state structure containing all UI-relevant data
#[derive(Debug, Clone, Default)]
pub struct GuiState {
    /// Raw text of the tick count entry
    pub tick_entry: String,
    /// Last error message
    pub last_error: Option<String>,
}

impl GuiState {
    /// Create a new GUI state instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-validate the tick entry after the user edited it.
    pub fn tick_entry_changed(&mut self) {
        if self.tick_entry.trim().is_empty() {
            self.clear_error();
            return;
        }
        match try_parse_tick_entry(&self.tick_entry) {
            Ok(_) => self.clear_error(),
            Err(e) => self.set_error(format!(
                "Invalid tick entry value '{}': {}",
                self.tick_entry, e
            )),
        }
    }

    /// Tick count requested by the "Tick N" button; invalid entries count as zero.
    pub fn tick_entry_value(&self) -> u64 {
        parse_tick_entry(&self.tick_entry)
    }

    /// Set an error message
    pub fn set_error(&mut self, error: String) {
        self.last_error = Some(error);
    }

    /// Clear the error message
    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Get the current error message
    pub fn get_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
