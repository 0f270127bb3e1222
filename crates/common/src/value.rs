//! Operand stack cells.
//!
//! A cell is 32 bits with no type tag. The same bits read back as either a
//! signed integer or an IEEE-754 single-precision float; each instruction
//! decides which interpretation it wants.

use std::fmt;

/// One untagged 32-bit operand stack cell.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Value(u32);

impl Value {
    /// Build a cell holding an integer.
    pub fn from_integer(value: i32) -> Self {
        Self(value as u32)
    }

    /// Build a cell holding a float.
    pub fn from_float(value: f32) -> Self {
        Self(value.to_bits())
    }

    /// Build a cell from raw bits.
    pub fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Read the cell as a signed integer.
    pub fn integer(self) -> i32 {
        self.0 as i32
    }

    /// Read the cell as a float.
    pub fn float(self) -> f32 {
        f32::from_bits(self.0)
    }

    /// The raw bits.
    pub fn bits(self) -> u32 {
        self.0
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::from_integer(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::from_float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::from_integer(i32::from(value))
    }
}

// Both readings are shown since the cell itself does not know which applies.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Value({:#010x} = {}i / {:?}f)",
            self.0,
            self.integer(),
            self.float()
        )
    }
}
