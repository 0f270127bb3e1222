//! Binary arithmetic and comparison.
//!
//! Both read the left operand from stack index 1 and the right operand from
//! index 0, pop once, and write the result over the new top.

use crate::error::RuntimeError;
use crate::opcodes::Opcode0;
use crate::runtime::Runtime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// Wrapping integer arithmetic.
pub struct IntArithmetic(pub ArithOp);

impl Opcode0 for IntArithmetic {
    fn execute(&self, runtime: &mut Runtime<'_>) -> Result<(), RuntimeError> {
        let rhs = runtime.integer(0)?;
        if self.0 == ArithOp::Div && rhs == 0 {
            return Err(RuntimeError::DivisionByZero);
        }
        let lhs = runtime.integer(1)?;
        let result = match self.0 {
            ArithOp::Add => lhs.wrapping_add(rhs),
            ArithOp::Sub => lhs.wrapping_sub(rhs),
            ArithOp::Mul => lhs.wrapping_mul(rhs),
            ArithOp::Div => lhs.wrapping_div(rhs),
        };
        runtime.pop()?;
        runtime.set_integer(0, result)
    }
}

pub struct FloatArithmetic(pub ArithOp);

impl Opcode0 for FloatArithmetic {
    fn execute(&self, runtime: &mut Runtime<'_>) -> Result<(), RuntimeError> {
        let rhs = runtime.float(0)?;
        if self.0 == ArithOp::Div && rhs == 0.0 {
            return Err(RuntimeError::DivisionByZero);
        }
        let lhs = runtime.float(1)?;
        let result = match self.0 {
            ArithOp::Add => lhs + rhs,
            ArithOp::Sub => lhs - rhs,
            ArithOp::Mul => lhs * rhs,
            ArithOp::Div => lhs / rhs,
        };
        runtime.pop()?;
        runtime.set_float(0, result)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

impl CompareOp {
    pub fn apply<T: PartialOrd>(self, lhs: T, rhs: T) -> bool {
        match self {
            CompareOp::Equal => lhs == rhs,
            CompareOp::NotEqual => lhs != rhs,
            CompareOp::Less => lhs < rhs,
            CompareOp::LessOrEqual => lhs <= rhs,
            CompareOp::Greater => lhs > rhs,
            CompareOp::GreaterOrEqual => lhs >= rhs,
        }
    }
}

/// Integer comparison; the result is an integer 1 or 0.
pub struct IntCompare(pub CompareOp);

impl Opcode0 for IntCompare {
    fn execute(&self, runtime: &mut Runtime<'_>) -> Result<(), RuntimeError> {
        let rhs = runtime.integer(0)?;
        let lhs = runtime.integer(1)?;
        runtime.pop()?;
        runtime.set(0, self.0.apply(lhs, rhs))
    }
}

/// Float comparison; the result is an integer 1 or 0.
pub struct FloatCompare(pub CompareOp);

impl Opcode0 for FloatCompare {
    fn execute(&self, runtime: &mut Runtime<'_>) -> Result<(), RuntimeError> {
        let rhs = runtime.float(0)?;
        let lhs = runtime.float(1)?;
        runtime.pop()?;
        runtime.set(0, self.0.apply(lhs, rhs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_ops() {
        assert!(CompareOp::Less.apply(1, 2));
        assert!(!CompareOp::Less.apply(2, 2));
        assert!(CompareOp::LessOrEqual.apply(2, 2));
        assert!(CompareOp::NotEqual.apply(1.0, 2.0));
        assert!(!CompareOp::Equal.apply(f32::NAN, f32::NAN));
        assert!(CompareOp::GreaterOrEqual.apply(-1, -1));
    }
}
