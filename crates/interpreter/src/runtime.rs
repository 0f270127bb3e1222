//! Execution frames and the per-run view instructions operate on.
//!
//! A [`Frame`] is the state of one nesting level: the program counter and
//! the operand stack. The interpreter owns the live frame and snapshots it
//! onto its call stack when a nested run begins. A [`Runtime`] binds the
//! live frame to the program and host of the current `run` call.
//!
//! Stack indices count from the top: index 0 is the most recently pushed
//! cell.

use crate::context::Context;
use crate::error::RuntimeError;
use mwscript_common::{Program, Value};
use std::cell::RefCell;

/// Program counter and operand stack of one nesting level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pc: i32,
    stack: Vec<Value>,
}

impl Frame {
    /// Empty the stack and reset the program counter. Idempotent.
    pub fn clear(&mut self) {
        self.pc = 0;
        self.stack.clear();
    }

    pub fn pc(&self) -> i32 {
        self.pc
    }

    /// Operand stack, bottom first.
    pub fn stack(&self) -> &[Value] {
        &self.stack
    }
}

/// The live frame bound to a program and a host for one `run` call.
///
/// Every accessor borrows the frame only for the duration of the call, so
/// a host callback may start a nested run on the same interpreter while an
/// instruction is executing.
pub struct Runtime<'a> {
    frame: &'a RefCell<Frame>,
    program: &'a Program,
    context: &'a mut dyn Context,
}

impl<'a> Runtime<'a> {
    /// Bind `frame` to `program` and `context`, resetting the program
    /// counter to 0 and clearing the stack.
    pub fn configure(
        frame: &'a RefCell<Frame>,
        program: &'a Program,
        context: &'a mut dyn Context,
    ) -> Self {
        frame.borrow_mut().clear();
        Self {
            frame,
            program,
            context,
        }
    }

    /// Empty the stack and reset the program counter.
    pub fn clear(&mut self) {
        self.frame.borrow_mut().clear();
    }

    pub fn program(&self) -> &'a Program {
        self.program
    }

    /// The bound host.
    pub fn context(&mut self) -> &mut dyn Context {
        &mut *self.context
    }

    // --- Program counter ---

    pub fn pc(&self) -> i32 {
        self.frame.borrow().pc
    }

    /// Set the program counter. -1 ends the frame.
    pub fn set_pc(&mut self, pc: i32) {
        self.frame.borrow_mut().pc = pc;
    }

    // --- Operand stack ---

    pub fn push(&mut self, value: impl Into<Value>) {
        self.frame.borrow_mut().stack.push(value.into());
    }

    pub fn pop(&mut self) -> Result<Value, RuntimeError> {
        self.frame
            .borrow_mut()
            .stack
            .pop()
            .ok_or(RuntimeError::StackUnderflow)
    }

    /// Number of cells on the stack.
    pub fn stack_len(&self) -> usize {
        self.frame.borrow().stack.len()
    }

    /// Cell at `index` from the top.
    pub fn get(&self, index: usize) -> Result<Value, RuntimeError> {
        let frame = self.frame.borrow();
        let size = frame.stack.len();
        if index >= size {
            return Err(RuntimeError::StackIndexOutOfRange { index, size });
        }
        Ok(frame.stack[size - 1 - index])
    }

    /// Overwrite the cell at `index` from the top.
    pub fn set(&mut self, index: usize, value: impl Into<Value>) -> Result<(), RuntimeError> {
        let mut frame = self.frame.borrow_mut();
        let size = frame.stack.len();
        if index >= size {
            return Err(RuntimeError::StackIndexOutOfRange { index, size });
        }
        frame.stack[size - 1 - index] = value.into();
        Ok(())
    }

    pub fn integer(&self, index: usize) -> Result<i32, RuntimeError> {
        self.get(index).map(Value::integer)
    }

    pub fn float(&self, index: usize) -> Result<f32, RuntimeError> {
        self.get(index).map(Value::float)
    }

    pub fn set_integer(&mut self, index: usize, value: i32) -> Result<(), RuntimeError> {
        self.set(index, value)
    }

    pub fn set_float(&mut self, index: usize, value: f32) -> Result<(), RuntimeError> {
        self.set(index, value)
    }

    /// Pop a cell and read it as an integer.
    pub fn pop_integer(&mut self) -> Result<i32, RuntimeError> {
        self.pop().map(Value::integer)
    }

    // --- Literals ---

    pub fn integer_literal(&self, index: i32) -> Result<i32, RuntimeError> {
        self.program
            .integer(index)
            .ok_or(RuntimeError::LiteralOutOfRange {
                kind: "integer",
                index,
            })
    }

    pub fn float_literal(&self, index: i32) -> Result<f32, RuntimeError> {
        self.program
            .float(index)
            .ok_or(RuntimeError::LiteralOutOfRange {
                kind: "float",
                index,
            })
    }

    pub fn string_literal(&self, index: i32) -> Result<&'a str, RuntimeError> {
        self.program
            .string(index)
            .ok_or(RuntimeError::LiteralOutOfRange {
                kind: "string",
                index,
            })
    }

    /// Snapshot of the live frame.
    pub fn frame(&self) -> Frame {
        self.frame.borrow().clone()
    }
}
