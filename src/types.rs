use std::fmt;

/// Fixed-width bit field backing every bank on the panel (1 to 32 bits)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitBank {
    width: u32,
    value: u32,
}

impl BitBank {
    pub const MAX_WIDTH: u32 = 32;

    pub fn new(width: u32) -> Self {
        BitBank {
            width: width.clamp(1, Self::MAX_WIDTH),
            value: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// All bits belonging to this bank set to 1.
    pub fn mask(&self) -> u32 {
        if self.width >= Self::MAX_WIDTH {
            u32::MAX
        } else {
            (1u32 << self.width) - 1
        }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// Store `value`, silently dropping bits above the bank width.
    pub fn set(&mut self, value: u32) {
        self.value = value & self.mask();
    }

    pub fn clear(&mut self) {
        self.value = 0;
    }

    // Bit indices wrap modulo the width
    fn index_mask(&self, bit: u32) -> u32 {
        1u32 << (bit % self.width)
    }

    pub fn bit(&self, bit: u32) -> bool {
        self.value & self.index_mask(bit) != 0
    }

    pub fn set_bit(&mut self, bit: u32) {
        self.value |= self.index_mask(bit);
    }

    pub fn clear_bit(&mut self, bit: u32) {
        self.value &= !self.index_mask(bit);
    }

    /// Flip one bit and return its new state.
    pub fn toggle_bit(&mut self, bit: u32) -> bool {
        self.value ^= self.index_mask(bit);
        self.bit(bit)
    }

    /// Number of hex digits needed to print the full width.
    pub fn hex_width(&self) -> usize {
        self.width.div_ceil(4) as usize
    }
}

impl fmt::Display for BitBank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(0x{:0width$x})", self.value, width = self.hex_width())
    }
}

impl From<BitBank> for u32 {
    fn from(bank: BitBank) -> Self {
        bank.value()
    }
}
