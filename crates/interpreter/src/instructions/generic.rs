//! Immediate push, coercions, negation and literal fetch.

use crate::error::RuntimeError;
use crate::opcodes::{Opcode0, Opcode1};
use crate::runtime::Runtime;

/// Push the immediate, reinterpreted as a signed integer.
pub struct PushInt;

impl Opcode1 for PushInt {
    fn execute(&self, runtime: &mut Runtime<'_>, arg: u32) -> Result<(), RuntimeError> {
        runtime.push(arg as i32);
        Ok(())
    }
}

/// Convert the integer at stack index `.0` to a float in place.
pub struct IntToFloat(pub usize);

impl Opcode0 for IntToFloat {
    fn execute(&self, runtime: &mut Runtime<'_>) -> Result<(), RuntimeError> {
        let value = runtime.integer(self.0)?;
        runtime.set_float(self.0, value as f32)
    }
}

/// Convert the float at stack index `.0` to an integer in place, truncating
/// toward zero.
pub struct FloatToInt(pub usize);

impl Opcode0 for FloatToInt {
    fn execute(&self, runtime: &mut Runtime<'_>) -> Result<(), RuntimeError> {
        let value = runtime.float(self.0)?;
        runtime.set_integer(self.0, value as i32)
    }
}

pub struct NegateInt;

impl Opcode0 for NegateInt {
    fn execute(&self, runtime: &mut Runtime<'_>) -> Result<(), RuntimeError> {
        let value = runtime.integer(0)?;
        runtime.set_integer(0, value.wrapping_neg())
    }
}

pub struct NegateFloat;

impl Opcode0 for NegateFloat {
    fn execute(&self, runtime: &mut Runtime<'_>) -> Result<(), RuntimeError> {
        let value = runtime.float(0)?;
        runtime.set_float(0, -value)
    }
}

pub struct SquareRoot;

impl Opcode0 for SquareRoot {
    fn execute(&self, runtime: &mut Runtime<'_>) -> Result<(), RuntimeError> {
        let value = runtime.float(0)?;
        if value < 0.0 {
            return Err(RuntimeError::NegativeSquareRoot(value));
        }
        runtime.set_float(0, value.sqrt())
    }
}

/// Replace the literal index on top with the integer literal.
pub struct FetchIntLiteral;

impl Opcode0 for FetchIntLiteral {
    fn execute(&self, runtime: &mut Runtime<'_>) -> Result<(), RuntimeError> {
        let index = runtime.integer(0)?;
        let value = runtime.integer_literal(index)?;
        runtime.set_integer(0, value)
    }
}

/// Replace the literal index on top with the float literal.
pub struct FetchFloatLiteral;

impl Opcode0 for FetchFloatLiteral {
    fn execute(&self, runtime: &mut Runtime<'_>) -> Result<(), RuntimeError> {
        let index = runtime.integer(0)?;
        let value = runtime.float_literal(index)?;
        runtime.set_float(0, value)
    }
}
