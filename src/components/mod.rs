// Front panel components module
pub mod hex_display;
pub mod keys;
pub mod led_bank;
pub mod switches;

// Re-export the panel component types
pub use hex_display::{HexDisplay, Segment};
pub use keys::KeyBank;
pub use led_bank::{LedBank, LedColor};
pub use switches::SwitchBank;
