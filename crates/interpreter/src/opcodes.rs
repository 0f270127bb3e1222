//! Instruction traits and the per-segment dispatch tables.

use crate::error::RuntimeError;
use crate::runtime::Runtime;
use mwscript_common::{Instruction, Segment};
use std::collections::HashMap;

/// An instruction without an immediate argument (segment 5).
pub trait Opcode0: Send + Sync {
    fn execute(&self, runtime: &mut Runtime<'_>) -> Result<(), RuntimeError>;
}

/// An instruction with an immediate argument (segments 0, 2 and 3).
pub trait Opcode1: Send + Sync {
    fn execute(&self, runtime: &mut Runtime<'_>, arg: u32) -> Result<(), RuntimeError>;
}

/// Installed instructions, one map per segment.
///
/// Populated once before use. Installing the same number twice in a segment
/// is a programming error and panics.
#[derive(Default)]
pub struct OpcodeTable {
    segment0: HashMap<u32, Box<dyn Opcode1>>,
    segment2: HashMap<u32, Box<dyn Opcode1>>,
    segment3: HashMap<u32, Box<dyn Opcode1>>,
    segment5: HashMap<u32, Box<dyn Opcode0>>,
}

impl OpcodeTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// A table with every built-in instruction installed.
    pub fn with_builtins() -> Self {
        let mut table = Self::new();
        crate::install::install_opcodes(&mut table);
        table
    }

    pub fn install_segment0(&mut self, code: u32, opcode: Box<dyn Opcode1>) {
        insert_unique(&mut self.segment0, Segment::Zero, code, opcode);
    }

    pub fn install_segment2(&mut self, code: u32, opcode: Box<dyn Opcode1>) {
        insert_unique(&mut self.segment2, Segment::Two, code, opcode);
    }

    pub fn install_segment3(&mut self, code: u32, opcode: Box<dyn Opcode1>) {
        insert_unique(&mut self.segment3, Segment::Three, code, opcode);
    }

    pub fn install_segment5(&mut self, code: u32, opcode: Box<dyn Opcode0>) {
        insert_unique(&mut self.segment5, Segment::Five, code, opcode);
    }

    /// Whether something is installed at `code` in `segment`.
    pub fn contains(&self, segment: Segment, code: u32) -> bool {
        match segment {
            Segment::Zero => self.segment0.contains_key(&code),
            Segment::Two => self.segment2.contains_key(&code),
            Segment::Three => self.segment3.contains_key(&code),
            Segment::Five => self.segment5.contains_key(&code),
        }
    }

    /// Total number of installed instructions.
    pub fn len(&self) -> usize {
        self.segment0.len() + self.segment2.len() + self.segment3.len() + self.segment5.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run the instruction installed for a decoded word.
    pub fn execute(
        &self,
        instr: Instruction,
        runtime: &mut Runtime<'_>,
    ) -> Result<(), RuntimeError> {
        let code = instr.opcode();
        let unknown = RuntimeError::UnknownOpcode {
            segment: instr.segment(),
            opcode: code,
        };
        let with_arg = match instr.segment() {
            Segment::Zero => &self.segment0,
            Segment::Two => &self.segment2,
            Segment::Three => &self.segment3,
            Segment::Five => {
                let opcode = self.segment5.get(&code).ok_or(unknown)?;
                return opcode.execute(runtime);
            }
        };
        let opcode = with_arg.get(&code).ok_or(unknown)?;
        opcode.execute(runtime, instr.arg())
    }
}

fn insert_unique<T: ?Sized>(
    map: &mut HashMap<u32, Box<T>>,
    segment: Segment,
    code: u32,
    opcode: Box<T>,
) {
    assert!(
        code <= segment.max_opcode(),
        "opcode {code} does not fit segment {segment}"
    );
    assert!(
        !map.contains_key(&code),
        "opcode {code} already installed in segment {segment}"
    );
    map.insert(code, opcode);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Nop;
    impl Opcode0 for Nop {
        fn execute(&self, _runtime: &mut Runtime<'_>) -> Result<(), RuntimeError> {
            Ok(())
        }
    }

    struct NopArg;
    impl Opcode1 for NopArg {
        fn execute(&self, _runtime: &mut Runtime<'_>, _arg: u32) -> Result<(), RuntimeError> {
            Ok(())
        }
    }

    #[test]
    fn install_and_contains() {
        let mut table = OpcodeTable::new();
        assert!(table.is_empty());
        table.install_segment5(3, Box::new(Nop));
        table.install_segment2(3, Box::new(NopArg));
        assert!(table.contains(Segment::Five, 3));
        assert!(table.contains(Segment::Two, 3));
        assert!(!table.contains(Segment::Zero, 3));
        assert_eq!(table.len(), 2);
    }

    #[test]
    #[should_panic(expected = "already installed in segment 5")]
    fn duplicate_install_panics() {
        let mut table = OpcodeTable::new();
        table.install_segment5(1, Box::new(Nop));
        table.install_segment5(1, Box::new(Nop));
    }

    #[test]
    #[should_panic(expected = "does not fit segment 0")]
    fn oversized_code_panics() {
        let mut table = OpcodeTable::new();
        table.install_segment0(64, Box::new(NopArg));
    }

    #[test]
    fn builtins_cover_the_manifest() {
        let table = OpcodeTable::with_builtins();
        assert_eq!(table.len(), mwscript_common::ALL_OPCODES.len());
        for op in mwscript_common::ALL_OPCODES {
            assert!(table.contains(op.segment(), op.code()), "{op:?}");
        }
    }
}
