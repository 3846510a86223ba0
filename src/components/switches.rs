use crate::types::BitBank;

/// Persistent toggle switches. Bit 0 is the rightmost switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchBank {
    bits: BitBank,
}

impl SwitchBank {
    pub fn new(count: u32) -> Self {
        SwitchBank {
            bits: BitBank::new(count),
        }
    }

    pub fn count(&self) -> u32 {
        self.bits.width()
    }

    pub fn is_on(&self, switch: u32) -> bool {
        self.bits.bit(switch)
    }

    /// Set one switch; returns true if its position changed.
    pub fn set(&mut self, switch: u32, on: bool) -> bool {
        if self.bits.bit(switch) == on {
            return false;
        }
        self.bits.toggle_bit(switch);
        true
    }

    pub fn toggle(&mut self, switch: u32) -> bool {
        self.bits.toggle_bit(switch)
    }

    pub fn clear(&mut self) {
        self.bits.clear();
    }

    pub fn value(&self) -> u32 {
        self.bits.value()
    }

    pub fn label(&self) -> String {
        self.bits.to_string()
    }
}
