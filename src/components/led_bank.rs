use crate::types::BitBank;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedColor {
    Red,
    Green,
}

impl LedColor {
    pub fn label(self) -> &'static str {
        match self {
            LedColor::Red => "LEDR",
            LedColor::Green => "LEDG",
        }
    }
}

/// A horizontal strip of same-colored, active-high LEDs.
///
/// Bit 0 drives the rightmost LED. Values wider than the strip are
/// truncated to its width rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedBank {
    bits: BitBank,
    color: LedColor,
}

impl LedBank {
    pub fn new(count: u32, color: LedColor) -> Self {
        LedBank {
            bits: BitBank::new(count),
            color,
        }
    }

    pub fn color(&self) -> LedColor {
        self.color
    }

    pub fn count(&self) -> u32 {
        self.bits.width()
    }

    pub fn mask(&self) -> u32 {
        self.bits.mask()
    }

    pub fn set(&mut self, state: u32) {
        self.bits.set(state);
    }

    pub fn state(&self) -> u32 {
        self.bits.value()
    }

    /// Whether the LED driven by bit `bit` is on.
    pub fn is_lit(&self, bit: u32) -> bool {
        self.bits.bit(bit)
    }

    /// Hex readout shown next to the strip, e.g. `(0x00000)`.
    pub fn label(&self) -> String {
        self.bits.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_red_bank_masks_to_18_bits() {
        let mut ledr = LedBank::new(18, LedColor::Red);
        ledr.set(0xFFFF_FFFF);
        assert_eq!(ledr.state(), 0x3FFFF);
        assert_eq!(ledr.label(), "(0x3ffff)");
    }

    #[test]
    fn test_green_bank_masks_to_9_bits() {
        let mut ledg = LedBank::new(9, LedColor::Green);
        ledg.set(0x1201);
        assert_eq!(ledg.state(), 0x001);
        assert!(ledg.is_lit(0));
        assert!(!ledg.is_lit(8));
        assert_eq!(ledg.label(), "(0x001)");
    }
}
