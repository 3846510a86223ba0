//! # DE2 Front Panel Library
//!
//! A simulated front panel for a DE2-115 style FPGA development board,
//! driven by a caller-supplied digital simulation.
//!
//! This library provides:
//! - A tick driver that runs simulation ticks in batches and flags the final tick
//! - Scheduled futures for events that happen a number of ticks later (key releases)
//! - Bit-field models for hex displays, red/green LEDs, switches and keys
//! - JSON-configurable panel dimensions and key timing
//! - egui desktop and ratatui terminal front-ends

pub mod components;
pub mod console;
pub mod demo;
pub mod gui;
pub mod panel;
pub mod scheduler;
pub mod system_config;
pub mod timing;
pub mod types;

// Re-export commonly used items for easier importing
pub use panel::{parse_tick_entry, PanelState};
pub use system_config::{ConfigError, KeyTiming, PanelConfig};
pub use timing::{FixedDelay, RandomDelay, ReleaseDelay};
pub use types::BitBank;
