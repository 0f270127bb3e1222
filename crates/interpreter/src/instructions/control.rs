//! Program counter manipulation.
//!
//! The counter has already been advanced past the executing instruction
//! when these run.

use crate::error::RuntimeError;
use crate::opcodes::{Opcode0, Opcode1};
use crate::runtime::Runtime;

/// End the current frame.
pub struct Return;

impl Opcode0 for Return {
    fn execute(&self, runtime: &mut Runtime<'_>) -> Result<(), RuntimeError> {
        runtime.set_pc(-1);
        Ok(())
    }
}

/// Pop an integer and skip the next instruction if it is zero.
pub struct SkipZero;

impl Opcode0 for SkipZero {
    fn execute(&self, runtime: &mut Runtime<'_>) -> Result<(), RuntimeError> {
        if runtime.pop_integer()? == 0 {
            runtime.set_pc(runtime.pc() + 1);
        }
        Ok(())
    }
}

/// Pop an integer and skip the next instruction if it is nonzero.
pub struct SkipNonZero;

impl Opcode0 for SkipNonZero {
    fn execute(&self, runtime: &mut Runtime<'_>) -> Result<(), RuntimeError> {
        if runtime.pop_integer()? != 0 {
            runtime.set_pc(runtime.pc() + 1);
        }
        Ok(())
    }
}

/// Jump `arg` instructions forward from the jump itself.
pub struct JumpForward;

impl Opcode1 for JumpForward {
    fn execute(&self, runtime: &mut Runtime<'_>, arg: u32) -> Result<(), RuntimeError> {
        if arg == 0 {
            return Err(RuntimeError::InfiniteLoop);
        }
        runtime.set_pc(runtime.pc() + arg as i32 - 1);
        Ok(())
    }
}

/// Jump `arg` instructions backward from the jump itself.
pub struct JumpBackward;

impl Opcode1 for JumpBackward {
    fn execute(&self, runtime: &mut Runtime<'_>, arg: u32) -> Result<(), RuntimeError> {
        if arg == 0 {
            return Err(RuntimeError::InfiniteLoop);
        }
        runtime.set_pc(runtime.pc() - arg as i32 - 1);
        Ok(())
    }
}
