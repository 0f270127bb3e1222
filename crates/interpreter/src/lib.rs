//! Stack-based interpreter for compiled game scripts.
//!
//! The interpreter decodes 32-bit instruction words, dispatches them through
//! per-segment opcode tables and runs them against an operand stack of
//! untagged 32-bit cells. Everything the game can observe goes through a
//! host-supplied [`Context`].
//!
//! # Usage
//!
//! ```
//! use mwscript_common::{Instruction, Opcode, Program};
//! use mwscript_interpreter::{Context, HostResult, Interpreter};
//!
//! #[derive(Default)]
//! struct Host {
//!     shown: Vec<String>,
//! }
//!
//! impl Context for Host {
//!     fn message_box(&mut self, message: &str, _buttons: &[String]) -> HostResult<()> {
//!         self.shown.push(message.to_string());
//!         Ok(())
//!     }
//! }
//!
//! let word = |op, arg| Instruction::from_opcode(op, arg).unwrap().encode();
//! let program = Program::with_literals(
//!     vec![
//!         word(Opcode::PushInt, 50),
//!         word(Opcode::PushInt, 0),
//!         word(Opcode::MessageBox, 0),
//!     ],
//!     vec![],
//!     vec![],
//!     vec!["You have %d gold".to_string()],
//! );
//!
//! let mut host = Host::default();
//! Interpreter::new().run(&program, &mut host).unwrap();
//! assert_eq!(host.shown, ["You have 50 gold"]);
//! ```

pub mod context;
pub mod defines;
pub mod error;
pub mod format;
pub mod install;
pub mod instructions;
pub mod interpreter;
pub mod opcodes;
pub mod runtime;

pub use context::{Context, VarType};
pub use defines::{fix_defines, DefinesMode};
pub use error::{HostError, HostResult, RuntimeError};
pub use format::format_message;
pub use install::install_opcodes;
pub use interpreter::Interpreter;
pub use opcodes::{Opcode0, Opcode1, OpcodeTable};
pub use runtime::{Frame, Runtime};
