//! Runtime and host errors.
//!
//! Every failure is fatal to the current `run` call and propagates out of
//! it unchanged. The only place errors are swallowed is escape
//! substitution in message text (see [`crate::defines`]).

use mwscript_common::{DecodeError, Segment};
use thiserror::Error;

/// Errors raised while executing bytecode.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// Pop on an empty operand stack.
    #[error("stack underflow")]
    StackUnderflow,

    /// Indexed access past the bottom of the operand stack.
    #[error("stack index {index} out of range (size {size})")]
    StackIndexOutOfRange { index: usize, size: usize },

    /// A literal index is negative or past the end of its pool.
    #[error("{kind} literal index {index} out of range")]
    LiteralOutOfRange { kind: &'static str, index: i32 },

    /// Integer or float division by exactly zero.
    #[error("division by zero")]
    DivisionByZero,

    /// `Random` received a negative limit.
    #[error("random limit must not be negative: {0}")]
    NegativeRandomLimit(i32),

    /// `SquareRoot` received a negative operand.
    #[error("square root of negative number: {0}")]
    NegativeSquareRoot(f32),

    /// A jump with a zero immediate would never advance.
    #[error("infinite loop")]
    InfiniteLoop,

    /// The word decoded but nothing is installed at its opcode number.
    #[error("unknown opcode {opcode} in segment {segment}")]
    UnknownOpcode { segment: Segment, opcode: u32 },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Host(#[from] HostError),
}

/// An error raised by a host [`Context`](crate::Context) implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HostError {
    pub message: String,
}

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The host does not provide `capability`.
    pub fn unsupported(capability: &str) -> Self {
        Self::new(format!("host does not support {capability}"))
    }
}

// Lets a host that runs a nested script report the nested failure with `?`.
impl From<RuntimeError> for HostError {
    fn from(err: RuntimeError) -> Self {
        match err {
            RuntimeError::Host(host) => host,
            other => Self::new(other.to_string()),
        }
    }
}

/// Result type for host callbacks.
pub type HostResult<T> = Result<T, HostError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats() {
        assert_eq!(RuntimeError::StackUnderflow.to_string(), "stack underflow");
        assert_eq!(RuntimeError::DivisionByZero.to_string(), "division by zero");
        assert_eq!(RuntimeError::InfiniteLoop.to_string(), "infinite loop");
        assert_eq!(
            RuntimeError::StackIndexOutOfRange { index: 2, size: 1 }.to_string(),
            "stack index 2 out of range (size 1)"
        );
        assert_eq!(
            RuntimeError::LiteralOutOfRange {
                kind: "string",
                index: -1
            }
            .to_string(),
            "string literal index -1 out of range"
        );
        assert_eq!(
            RuntimeError::UnknownOpcode {
                segment: Segment::Two,
                opcode: 7
            }
            .to_string(),
            "unknown opcode 7 in segment 2"
        );
        assert_eq!(
            RuntimeError::NegativeRandomLimit(-3).to_string(),
            "random limit must not be negative: -3"
        );
    }

    #[test]
    fn decode_error_is_transparent() {
        let err = RuntimeError::from(DecodeError::OutsideSegmentRange(0xFC00_0000));
        assert_eq!(
            err.to_string(),
            "opcode outside allocated segment range: 4227858432"
        );
    }

    #[test]
    fn host_error_roundtrip() {
        let host = HostError::unsupported("message_box");
        assert_eq!(host.to_string(), "host does not support message_box");
        let runtime = RuntimeError::from(host.clone());
        assert_eq!(runtime.to_string(), host.to_string());
        assert_eq!(HostError::from(runtime), host);
    }

    #[test]
    fn nested_runtime_error_becomes_host_error() {
        let host = HostError::from(RuntimeError::DivisionByZero);
        assert_eq!(host.message, "division by zero");
    }
}
