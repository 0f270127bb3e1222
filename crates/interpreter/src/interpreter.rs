//! The dispatch loop and frame bookkeeping.

use crate::context::Context;
use crate::error::RuntimeError;
use crate::opcodes::{Opcode0, Opcode1, OpcodeTable};
use crate::runtime::{Frame, Runtime};
use mwscript_common::{Instruction, Program};
use std::cell::{Cell, RefCell};
use std::mem;
use std::sync::Arc;
use tracing::{debug, trace};

/// Executes programs against a host [`Context`].
///
/// `run` takes `&self` so a host callback can start a nested run on the
/// same interpreter. The caller's frame is saved on an internal call stack
/// for the duration and restored exactly afterwards.
pub struct Interpreter {
    opcodes: Arc<OpcodeTable>,
    frame: RefCell<Frame>,
    call_stack: RefCell<Vec<Frame>>,
    running: Cell<bool>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// An interpreter with every built-in instruction installed.
    pub fn new() -> Self {
        Self::with_opcodes(Arc::new(OpcodeTable::with_builtins()))
    }

    /// An interpreter dispatching through a (possibly shared) table.
    pub fn with_opcodes(opcodes: Arc<OpcodeTable>) -> Self {
        Self {
            opcodes,
            frame: RefCell::new(Frame::default()),
            call_stack: RefCell::new(Vec::new()),
            running: Cell::new(false),
        }
    }

    pub fn opcodes(&self) -> &Arc<OpcodeTable> {
        &self.opcodes
    }

    pub fn install_segment0(&mut self, code: u32, opcode: Box<dyn Opcode1>) {
        self.table_mut().install_segment0(code, opcode);
    }

    pub fn install_segment2(&mut self, code: u32, opcode: Box<dyn Opcode1>) {
        self.table_mut().install_segment2(code, opcode);
    }

    pub fn install_segment3(&mut self, code: u32, opcode: Box<dyn Opcode1>) {
        self.table_mut().install_segment3(code, opcode);
    }

    pub fn install_segment5(&mut self, code: u32, opcode: Box<dyn Opcode0>) {
        self.table_mut().install_segment5(code, opcode);
    }

    fn table_mut(&mut self) -> &mut OpcodeTable {
        Arc::get_mut(&mut self.opcodes)
            .expect("opcode table is shared; install opcodes before sharing it")
    }

    /// Whether a run is in progress.
    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Number of runs in progress, counting nested ones.
    pub fn depth(&self) -> usize {
        if self.running.get() {
            self.call_stack.borrow().len() + 1
        } else {
            0
        }
    }

    /// Execute `program` until its program counter leaves the code.
    ///
    /// The interpreter returns to its previous state whether or not
    /// execution succeeds.
    pub fn run(&self, program: &Program, context: &mut dyn Context) -> Result<(), RuntimeError> {
        self.begin();
        let result = self.run_frame(program, context);
        self.end();
        result
    }

    fn run_frame(&self, program: &Program, context: &mut dyn Context) -> Result<(), RuntimeError> {
        let mut runtime = Runtime::configure(&self.frame, program, context);
        let code = program.instructions();
        loop {
            let pc = runtime.pc();
            let Some(&word) = usize::try_from(pc).ok().and_then(|i| code.get(i)) else {
                return Ok(());
            };
            runtime.set_pc(pc + 1);
            self.execute(word, &mut runtime)?;
        }
    }

    /// Decode and execute a single instruction word.
    pub fn execute(&self, word: u32, runtime: &mut Runtime<'_>) -> Result<(), RuntimeError> {
        let instr = Instruction::decode(word)?;
        trace!(
            pc = runtime.pc() - 1,
            segment = %instr.segment(),
            opcode = instr.opcode(),
            arg = instr.arg(),
            "execute"
        );
        self.opcodes.execute(instr, runtime)
    }

    fn begin(&self) {
        if self.running.get() {
            let saved = mem::take(&mut *self.frame.borrow_mut());
            self.call_stack.borrow_mut().push(saved);
        } else {
            self.running.set(true);
        }
        debug!(depth = self.depth(), "frame begin");
    }

    fn end(&self) {
        debug!(depth = self.depth(), "frame end");
        match self.call_stack.borrow_mut().pop() {
            Some(saved) => *self.frame.borrow_mut() = saved,
            None => {
                self.frame.borrow_mut().clear();
                self.running.set(false);
            }
        }
    }
}
