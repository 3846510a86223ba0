//! Seven-segment hex display bank.
//!
//! Each digit is a single byte of segment state. Segments are active-low:
//! a cleared bit lights the segment. Digit 0 is the rightmost display.
//!
//! ```text
//!       0
//!     -----
//!    |     |
//!  5 |     | 1
//!    |  6  |
//!     -----
//!    |     |
//!  4 |     | 2
//!    |  3  |
//!     -----
//! ```

/// Segment byte with every segment dark.
pub const BLANK: u8 = 0xFF;

/// Active-low glyphs for the hex nibbles 0-F.
const GLYPHS: [u8; 16] = [
    0xC0, 0xF9, 0xA4, 0xB0, 0x99, 0x92, 0x82, 0xF8, // 0-7
    0x80, 0x90, 0x88, 0x83, 0xC6, 0xA1, 0x86, 0x8E, // 8-F
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Top,
    UpperRight,
    LowerRight,
    Bottom,
    LowerLeft,
    UpperLeft,
    Middle,
}

impl Segment {
    pub const ALL: [Segment; 7] = [
        Segment::Top,
        Segment::UpperRight,
        Segment::LowerRight,
        Segment::Bottom,
        Segment::LowerLeft,
        Segment::UpperLeft,
        Segment::Middle,
    ];

    /// Bit position of this segment inside a digit byte.
    pub fn bit(self) -> u8 {
        self as u8
    }
}

/// Active-low segment byte that draws `nibble` (only the low 4 bits are used).
pub fn glyph(nibble: u8) -> u8 {
    GLYPHS[(nibble & 0x0F) as usize]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexDisplay {
    digits: Vec<u8>,
}

impl HexDisplay {
    /// Create `count` digits (at least one), all blanked.
    pub fn new(count: usize) -> Self {
        HexDisplay {
            digits: vec![BLANK; count.max(1)],
        }
    }

    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    /// Store the segment byte for digit `index`; the index wraps modulo the digit count.
    pub fn set(&mut self, index: usize, segments: u8) {
        let len = self.digits.len();
        self.digits[index % len] = segments;
    }

    pub fn get(&self, index: usize) -> u8 {
        self.digits[index % self.digits.len()]
    }

    pub fn is_lit(&self, index: usize, segment: Segment) -> bool {
        self.get(index) & (1 << segment.bit()) == 0
    }

    pub fn blank(&mut self) {
        self.digits.fill(BLANK);
    }

    /// Show `value` in hex across the digits, least significant nibble on digit 0.
    pub fn show_value(&mut self, value: u64) {
        for (i, digit) in self.digits.iter_mut().enumerate() {
            let nibble = value.checked_shr(4 * i as u32).unwrap_or(0) & 0x0F;
            *digit = glyph(nibble as u8);
        }
    }

    /// Digits ordered 0 (rightmost) upward.
    pub fn digits(&self) -> &[u8] {
        &self.digits
    }
}
