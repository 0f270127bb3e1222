//! Addressing segments of the instruction word.
//!
//! The top bits of every 32-bit instruction word select one of four
//! segments. Each segment splits the remaining bits differently between the
//! opcode and the immediate argument:
//!
//! ```text
//! Segment 0: 00 oooooo aaaaaaaaaaaaaaaaaaaaaaaa    6-bit opcode, 24-bit arg
//! Segment 2: 10 oooooooooo aaaaaaaaaaaaaaaaaaaa    10-bit opcode, 20-bit arg
//! Segment 3: 110000 oooooooooooooooooo aaaaaaaa    18-bit opcode, 8-bit arg
//! Segment 5: 110010 oooooooooooooooooooooooooo      26-bit opcode, no arg
//! ```

use std::fmt;

/// One of the four disjoint opcode address spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    /// `00` prefix, one-argument instructions with a 24-bit immediate.
    Zero,
    /// `10` prefix, one-argument instructions with a 20-bit immediate.
    Two,
    /// `110000` prefix, one-argument instructions with an 8-bit immediate.
    Three,
    /// `110010` prefix, zero-argument instructions.
    Five,
}

/// All segments, in numeric order.
pub const ALL_SEGMENTS: [Segment; 4] = [Segment::Zero, Segment::Two, Segment::Three, Segment::Five];

impl Segment {
    /// The segment's number as used in diagnostics (0, 2, 3 or 5).
    pub fn number(self) -> u8 {
        match self {
            Segment::Zero => 0,
            Segment::Two => 2,
            Segment::Three => 3,
            Segment::Five => 5,
        }
    }

    /// Width of the opcode field in bits.
    pub fn opcode_bits(self) -> u32 {
        match self {
            Segment::Zero => 6,
            Segment::Two => 10,
            Segment::Three => 18,
            Segment::Five => 26,
        }
    }

    /// Width of the immediate field in bits. Zero for segment 5.
    pub fn arg_bits(self) -> u32 {
        match self {
            Segment::Zero => 24,
            Segment::Two => 20,
            Segment::Three => 8,
            Segment::Five => 0,
        }
    }

    /// Largest opcode representable in this segment.
    pub fn max_opcode(self) -> u32 {
        (1u32 << self.opcode_bits()) - 1
    }

    /// Largest immediate representable in this segment.
    pub fn max_arg(self) -> u32 {
        match self.arg_bits() {
            0 => 0,
            bits => (1u32 << bits) - 1,
        }
    }

    /// Whether instructions in this segment carry an immediate argument.
    pub fn has_arg(self) -> bool {
        self.arg_bits() != 0
    }

    /// Fixed prefix bits of the segment, already shifted into place.
    pub(crate) fn prefix(self) -> u32 {
        match self {
            Segment::Zero => 0x0000_0000,
            Segment::Two => 0x8000_0000,
            Segment::Three => 0xC000_0000,
            Segment::Five => 0xC800_0000,
        }
    }

    /// Select the segment of a raw instruction word.
    ///
    /// Returns `None` when the top bits match none of the four patterns.
    pub fn of_word(word: u32) -> Option<Segment> {
        match word >> 30 {
            0 => return Some(Segment::Zero),
            2 => return Some(Segment::Two),
            _ => {}
        }
        match word >> 26 {
            0x30 => Some(Segment::Three),
            0x32 => Some(Segment::Five),
            _ => None,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_widths_fill_the_word() {
        assert_eq!(Segment::Zero.opcode_bits() + Segment::Zero.arg_bits(), 30);
        assert_eq!(Segment::Two.opcode_bits() + Segment::Two.arg_bits(), 30);
        assert_eq!(Segment::Three.opcode_bits() + Segment::Three.arg_bits(), 26);
        assert_eq!(Segment::Five.opcode_bits() + Segment::Five.arg_bits(), 26);
    }

    #[test]
    fn of_word_selects_by_prefix() {
        assert_eq!(Segment::of_word(0x0000_0000), Some(Segment::Zero));
        assert_eq!(Segment::of_word(0x3FFF_FFFF), Some(Segment::Zero));
        assert_eq!(Segment::of_word(0x8000_0000), Some(Segment::Two));
        assert_eq!(Segment::of_word(0xBFFF_FFFF), Some(Segment::Two));
        assert_eq!(Segment::of_word(0xC000_0000), Some(Segment::Three));
        assert_eq!(Segment::of_word(0xC3FF_FFFF), Some(Segment::Three));
        assert_eq!(Segment::of_word(0xC800_0000), Some(Segment::Five));
        assert_eq!(Segment::of_word(0xCBFF_FFFF), Some(Segment::Five));
    }

    #[test]
    fn of_word_rejects_unallocated_prefixes() {
        assert_eq!(Segment::of_word(0x4000_0000), None); // 01...
        assert_eq!(Segment::of_word(0xC400_0000), None); // 110001
        assert_eq!(Segment::of_word(0xCC00_0000), None); // 110011
        assert_eq!(Segment::of_word(0xD000_0000), None); // 1101..
        assert_eq!(Segment::of_word(0xFC00_0000), None); // 111111
        assert_eq!(Segment::of_word(0xFFFF_FFFF), None);
    }

    #[test]
    fn display_uses_segment_number() {
        let shown: Vec<String> = ALL_SEGMENTS.iter().map(|s| s.to_string()).collect();
        assert_eq!(shown, ["0", "2", "3", "5"]);
    }

    #[test]
    fn segment_five_has_no_argument() {
        assert!(!Segment::Five.has_arg());
        assert_eq!(Segment::Five.max_arg(), 0);
        assert_eq!(Segment::Three.max_arg(), 0xFF);
        assert_eq!(Segment::Zero.max_opcode(), 63);
    }
}
