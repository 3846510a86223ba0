use crate::types::BitBank;

/// Momentary push-buttons. Bit `i` set means KEY`i` is held down.
///
/// Only the panel's input router presses and releases keys; front-ends
/// read this bank but never write it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBank {
    bits: BitBank,
}

impl KeyBank {
    pub fn new(count: u32) -> Self {
        KeyBank {
            bits: BitBank::new(count),
        }
    }

    pub fn count(&self) -> u32 {
        self.bits.width()
    }

    /// Wrap an arbitrary key number onto an existing key.
    pub fn index(&self, key: u32) -> u32 {
        key % self.bits.width()
    }

    pub fn is_pressed(&self, key: u32) -> bool {
        self.bits.bit(key)
    }

    pub(crate) fn press(&mut self, key: u32) {
        self.bits.set_bit(key);
    }

    pub(crate) fn release(&mut self, key: u32) {
        self.bits.clear_bit(key);
    }

    pub fn value(&self) -> u32 {
        self.bits.value()
    }
}
