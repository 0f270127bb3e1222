//! Local, global and member variable access.

use crate::context::VarType;
use crate::error::RuntimeError;
use crate::opcodes::Opcode0;
use crate::runtime::Runtime;
use mwscript_common::Value;

/// Store `[0]` into the local at index `[1]`; pops both.
pub struct StoreLocal(pub VarType);

impl Opcode0 for StoreLocal {
    fn execute(&self, runtime: &mut Runtime<'_>) -> Result<(), RuntimeError> {
        let value = runtime.pop()?;
        let index = runtime.pop_integer()?;
        let context = runtime.context();
        match self.0 {
            VarType::Short => context.set_local_short(index, value.integer())?,
            VarType::Long => context.set_local_long(index, value.integer())?,
            VarType::Float => context.set_local_float(index, value.float())?,
        }
        Ok(())
    }
}

/// Replace the local index on top with the local's value.
pub struct FetchLocal(pub VarType);

impl Opcode0 for FetchLocal {
    fn execute(&self, runtime: &mut Runtime<'_>) -> Result<(), RuntimeError> {
        let index = runtime.integer(0)?;
        let context = runtime.context();
        let value = match self.0 {
            VarType::Short => Value::from(context.get_local_short(index)?),
            VarType::Long => Value::from(context.get_local_long(index)?),
            VarType::Float => Value::from(context.get_local_float(index)?),
        };
        runtime.set(0, value)
    }
}

/// Store `[0]` into the global named by the string literal at `[1]`; pops
/// both.
pub struct StoreGlobal(pub VarType);

impl Opcode0 for StoreGlobal {
    fn execute(&self, runtime: &mut Runtime<'_>) -> Result<(), RuntimeError> {
        let value = runtime.pop()?;
        let index = runtime.pop_integer()?;
        let name = runtime.string_literal(index)?;
        let context = runtime.context();
        match self.0 {
            VarType::Short => context.set_global_short(name, value.integer())?,
            VarType::Long => context.set_global_long(name, value.integer())?,
            VarType::Float => context.set_global_float(name, value.float())?,
        }
        Ok(())
    }
}

/// Replace the global name index on top with the global's value.
pub struct FetchGlobal(pub VarType);

impl Opcode0 for FetchGlobal {
    fn execute(&self, runtime: &mut Runtime<'_>) -> Result<(), RuntimeError> {
        let index = runtime.integer(0)?;
        let name = runtime.string_literal(index)?;
        let context = runtime.context();
        let value = match self.0 {
            VarType::Short => Value::from(context.get_global_short(name)?),
            VarType::Long => Value::from(context.get_global_long(name)?),
            VarType::Float => Value::from(context.get_global_float(name)?),
        };
        runtime.set(0, value)
    }
}

/// Store into a variable of another script.
///
/// Stack: `[0]` value, `[1]` owner id literal, `[2]` variable name
/// literal. Pops all three. `global` selects a global script over a
/// reference's local script.
pub struct StoreMember {
    pub var_type: VarType,
    pub global: bool,
}

impl Opcode0 for StoreMember {
    fn execute(&self, runtime: &mut Runtime<'_>) -> Result<(), RuntimeError> {
        let value = runtime.pop()?;
        let id_index = runtime.pop_integer()?;
        let name_index = runtime.pop_integer()?;
        let id = runtime.string_literal(id_index)?;
        let name = runtime.string_literal(name_index)?;
        let global = self.global;
        let context = runtime.context();
        match self.var_type {
            VarType::Short => context.set_member_short(id, name, value.integer(), global)?,
            VarType::Long => context.set_member_long(id, name, value.integer(), global)?,
            VarType::Float => context.set_member_float(id, name, value.float(), global)?,
        }
        Ok(())
    }
}

/// Fetch a variable of another script.
///
/// Stack: `[0]` owner id literal, `[1]` variable name literal. Pops one and
/// writes the value over the other.
pub struct FetchMember {
    pub var_type: VarType,
    pub global: bool,
}

impl Opcode0 for FetchMember {
    fn execute(&self, runtime: &mut Runtime<'_>) -> Result<(), RuntimeError> {
        let id_index = runtime.pop_integer()?;
        let name_index = runtime.integer(0)?;
        let id = runtime.string_literal(id_index)?;
        let name = runtime.string_literal(name_index)?;
        let global = self.global;
        let context = runtime.context();
        let value = match self.var_type {
            VarType::Short => Value::from(context.get_member_short(id, name, global)?),
            VarType::Long => Value::from(context.get_member_long(id, name, global)?),
            VarType::Float => Value::from(context.get_member_float(id, name, global)?),
        };
        runtime.set(0, value)
    }
}
