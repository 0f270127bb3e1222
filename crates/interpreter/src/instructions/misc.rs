//! Messages, randomness, reference state, scripts and distance.

use crate::error::RuntimeError;
use crate::format::format_message;
use crate::opcodes::{Opcode0, Opcode1};
use crate::runtime::Runtime;

/// Which reference an instruction acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The reference the running script is attached to.
    Own,
    /// A reference whose id literal index is popped from the stack.
    Explicit,
}

impl Target {
    fn pop<'a>(self, runtime: &mut Runtime<'a>) -> Result<Option<&'a str>, RuntimeError> {
        match self {
            Target::Own => Ok(None),
            Target::Explicit => {
                let index = runtime.pop_integer()?;
                runtime.string_literal(index).map(Some)
            }
        }
    }
}

/// Show a formatted message with `arg` buttons.
///
/// Pops the message literal index, then `arg` button literal indices (last
/// button first), then whatever the message's placeholders consume.
pub struct MessageBox;

impl Opcode1 for MessageBox {
    fn execute(&self, runtime: &mut Runtime<'_>, arg: u32) -> Result<(), RuntimeError> {
        let index = runtime.pop_integer()?;
        let message = runtime.string_literal(index)?;

        let mut buttons = Vec::with_capacity(arg as usize);
        for _ in 0..arg {
            let index = runtime.pop_integer()?;
            buttons.push(runtime.string_literal(index)?.to_string());
        }
        buttons.reverse();

        let text = format_message(message, runtime)?;
        runtime.context().message_box(&text, &buttons)?;
        Ok(())
    }
}

pub struct Report;

impl Opcode0 for Report {
    fn execute(&self, runtime: &mut Runtime<'_>) -> Result<(), RuntimeError> {
        let index = runtime.pop_integer()?;
        let message = runtime.string_literal(index)?;
        let text = format_message(message, runtime)?;
        runtime.context().report(&text)?;
        Ok(())
    }
}

/// Replace the limit on top with a roll in `[0, limit)`.
pub struct Random;

impl Opcode0 for Random {
    fn execute(&self, runtime: &mut Runtime<'_>) -> Result<(), RuntimeError> {
        let limit = runtime.integer(0)?;
        if limit < 0 {
            return Err(RuntimeError::NegativeRandomLimit(limit));
        }
        let roll = runtime.context().roll_dice(limit)?;
        runtime.set_integer(0, roll)
    }
}

pub struct MenuMode;

impl Opcode0 for MenuMode {
    fn execute(&self, runtime: &mut Runtime<'_>) -> Result<(), RuntimeError> {
        let value = runtime.context().menu_mode()?;
        runtime.push(value);
        Ok(())
    }
}

pub struct GetSecondsPassed;

impl Opcode0 for GetSecondsPassed {
    fn execute(&self, runtime: &mut Runtime<'_>) -> Result<(), RuntimeError> {
        let value = runtime.context().seconds_passed()?;
        runtime.push(value);
        Ok(())
    }
}

pub struct Enable(pub Target);

impl Opcode0 for Enable {
    fn execute(&self, runtime: &mut Runtime<'_>) -> Result<(), RuntimeError> {
        let id = self.0.pop(runtime)?;
        runtime.context().enable(id)?;
        Ok(())
    }
}

pub struct Disable(pub Target);

impl Opcode0 for Disable {
    fn execute(&self, runtime: &mut Runtime<'_>) -> Result<(), RuntimeError> {
        let id = self.0.pop(runtime)?;
        runtime.context().disable(id)?;
        Ok(())
    }
}

pub struct GetDisabled(pub Target);

impl Opcode0 for GetDisabled {
    fn execute(&self, runtime: &mut Runtime<'_>) -> Result<(), RuntimeError> {
        let id = self.0.pop(runtime)?;
        let disabled = runtime.context().is_disabled(id)?;
        runtime.push(disabled);
        Ok(())
    }
}

/// Replace the script name index on top with whether it is running.
pub struct ScriptRunning;

impl Opcode0 for ScriptRunning {
    fn execute(&self, runtime: &mut Runtime<'_>) -> Result<(), RuntimeError> {
        let name = runtime.string_literal(runtime.integer(0)?)?;
        let running = runtime.context().is_script_running(name)?;
        runtime.set(0, running)
    }
}

/// Start a script targeting the running script's own reference, or an
/// explicit one popped before the script name.
pub struct StartScript(pub Target);

impl Opcode0 for StartScript {
    fn execute(&self, runtime: &mut Runtime<'_>) -> Result<(), RuntimeError> {
        let id = self.0.pop(runtime)?;
        let index = runtime.pop_integer()?;
        let name = runtime.string_literal(index)?;
        let context = runtime.context();
        let target = match id {
            Some(id) => id.to_string(),
            None => context.target_id()?,
        };
        context.start_script(name, &target)?;
        Ok(())
    }
}

pub struct StopScript;

impl Opcode0 for StopScript {
    fn execute(&self, runtime: &mut Runtime<'_>) -> Result<(), RuntimeError> {
        let index = runtime.pop_integer()?;
        let name = runtime.string_literal(index)?;
        runtime.context().stop_script(name)?;
        Ok(())
    }
}

/// Replace the reference name index on top with the distance to it.
pub struct GetDistance(pub Target);

impl Opcode0 for GetDistance {
    fn execute(&self, runtime: &mut Runtime<'_>) -> Result<(), RuntimeError> {
        let id = self.0.pop(runtime)?;
        let name = runtime.string_literal(runtime.integer(0)?)?;
        let distance = runtime.context().distance(name, id)?;
        runtime.set_float(0, distance)
    }
}
