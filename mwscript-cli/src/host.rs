//! Console host: a [`Context`] that keeps variables in memory and prints
//! messages to an output stream.

use crate::config::RunConfig;
use mwscript_common::{Program, Value};
use mwscript_interpreter::{Context, HostError, HostResult, Interpreter, VarType};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::Cell;
use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::mem;
use std::time::Instant;
use tracing::{debug, warn};

/// Runs scripts outside the game.
///
/// Names of globals, scripts and references are case-insensitive. Each
/// nested script gets fresh locals; the caller's are restored when it
/// finishes. A started script counts as running until `StopScript`, whether
/// or not a program is registered for it. Shorts are narrowed to 16 bits on
/// store.
pub struct ConsoleContext<'i, W: Write> {
    interpreter: &'i Interpreter,
    out: W,
    target: String,
    pc_name: String,
    menu_mode: bool,
    rng: StdRng,
    last_frame: Cell<Instant>,
    locals: HashMap<i32, Value>,
    globals: HashMap<String, (VarType, Value)>,
    members: HashMap<(String, String, bool), Value>,
    scripts: HashMap<String, Program>,
    running: HashSet<String>,
    disabled: HashSet<String>,
}

impl<'i, W: Write> ConsoleContext<'i, W> {
    pub fn new(interpreter: &'i Interpreter, config: &RunConfig, out: W) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let globals = config
            .globals
            .iter()
            .map(|g| (key(&g.name), (g.var_type, narrow(g.var_type, g.value))))
            .collect();
        Self {
            interpreter,
            out,
            target: config.target.clone(),
            pc_name: config.pc_name.clone(),
            menu_mode: config.menu_mode,
            rng,
            last_frame: Cell::new(Instant::now()),
            locals: HashMap::new(),
            globals,
            members: HashMap::new(),
            scripts: HashMap::new(),
            running: HashSet::new(),
            disabled: HashSet::new(),
        }
    }

    /// Make `program` startable under `name`.
    pub fn add_script(&mut self, name: &str, program: Program) {
        self.scripts.insert(key(name), program);
    }

    fn write_line(&mut self, line: &str) -> HostResult<()> {
        writeln!(self.out, "{line}")
            .map_err(|e| HostError::new(format!("cannot write output: {e}")))
    }

    fn local(&self, index: i32) -> Value {
        self.locals.get(&index).copied().unwrap_or_default()
    }

    fn set_local(&mut self, index: i32, value: Value) -> HostResult<()> {
        self.locals.insert(index, value);
        Ok(())
    }

    fn get_global(&self, name: &str) -> HostResult<Value> {
        self.globals
            .get(&key(name))
            .map(|&(_, value)| value)
            .ok_or_else(|| HostError::new(format!("unknown global '{name}'")))
    }

    fn set_global(&mut self, name: &str, value: Value) -> HostResult<()> {
        let (var_type, slot) = self
            .globals
            .get_mut(&key(name))
            .ok_or_else(|| HostError::new(format!("unknown global '{name}'")))?;
        *slot = narrow(*var_type, value);
        Ok(())
    }

    fn member(&self, id: &str, name: &str, global: bool) -> Value {
        self.members
            .get(&(key(id), key(name), global))
            .copied()
            .unwrap_or_default()
    }

    fn set_member(&mut self, id: &str, name: &str, value: Value, global: bool) -> HostResult<()> {
        self.members.insert((key(id), key(name), global), value);
        Ok(())
    }

    fn reference(&self, id: Option<&str>) -> String {
        key(id.unwrap_or(self.target.as_str()))
    }
}

impl<W: Write> Context for ConsoleContext<'_, W> {
    fn get_local_short(&self, index: i32) -> HostResult<i32> {
        Ok(self.local(index).integer())
    }

    fn get_local_long(&self, index: i32) -> HostResult<i32> {
        Ok(self.local(index).integer())
    }

    fn get_local_float(&self, index: i32) -> HostResult<f32> {
        Ok(self.local(index).float())
    }

    fn set_local_short(&mut self, index: i32, value: i32) -> HostResult<()> {
        self.set_local(index, narrow(VarType::Short, Value::from(value)))
    }

    fn set_local_long(&mut self, index: i32, value: i32) -> HostResult<()> {
        self.set_local(index, Value::from(value))
    }

    fn set_local_float(&mut self, index: i32, value: f32) -> HostResult<()> {
        self.set_local(index, Value::from(value))
    }

    fn get_global_short(&self, name: &str) -> HostResult<i32> {
        self.get_global(name).map(Value::integer)
    }

    fn get_global_long(&self, name: &str) -> HostResult<i32> {
        self.get_global(name).map(Value::integer)
    }

    fn get_global_float(&self, name: &str) -> HostResult<f32> {
        self.get_global(name).map(Value::float)
    }

    fn set_global_short(&mut self, name: &str, value: i32) -> HostResult<()> {
        self.set_global(name, Value::from(value))
    }

    fn set_global_long(&mut self, name: &str, value: i32) -> HostResult<()> {
        self.set_global(name, Value::from(value))
    }

    fn set_global_float(&mut self, name: &str, value: f32) -> HostResult<()> {
        self.set_global(name, Value::from(value))
    }

    fn global_type(&self, name: &str) -> HostResult<Option<VarType>> {
        Ok(self.globals.get(&key(name)).map(|&(var_type, _)| var_type))
    }

    fn globals(&self) -> HostResult<Vec<String>> {
        Ok(self.globals.keys().cloned().collect())
    }

    fn get_member_short(&self, id: &str, name: &str, global: bool) -> HostResult<i32> {
        Ok(self.member(id, name, global).integer())
    }

    fn get_member_long(&self, id: &str, name: &str, global: bool) -> HostResult<i32> {
        Ok(self.member(id, name, global).integer())
    }

    fn get_member_float(&self, id: &str, name: &str, global: bool) -> HostResult<f32> {
        Ok(self.member(id, name, global).float())
    }

    fn set_member_short(&mut self, id: &str, name: &str, value: i32, global: bool) -> HostResult<()> {
        let value = narrow(VarType::Short, Value::from(value));
        self.set_member(id, name, value, global)
    }

    fn set_member_long(&mut self, id: &str, name: &str, value: i32, global: bool) -> HostResult<()> {
        self.set_member(id, name, Value::from(value), global)
    }

    fn set_member_float(&mut self, id: &str, name: &str, value: f32, global: bool) -> HostResult<()> {
        self.set_member(id, name, Value::from(value), global)
    }

    fn message_box(&mut self, message: &str, buttons: &[String]) -> HostResult<()> {
        self.write_line(message)?;
        for (i, button) in buttons.iter().enumerate() {
            self.write_line(&format!("  [{i}] {button}"))?;
        }
        Ok(())
    }

    fn menu_mode(&self) -> HostResult<bool> {
        Ok(self.menu_mode)
    }

    /// Wall-clock seconds since the previous call (or since the host was
    /// created).
    fn seconds_passed(&self) -> HostResult<f32> {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame.replace(now));
        Ok(elapsed.as_secs_f32())
    }

    fn enable(&mut self, id: Option<&str>) -> HostResult<()> {
        let id = self.reference(id);
        self.disabled.remove(&id);
        Ok(())
    }

    fn disable(&mut self, id: Option<&str>) -> HostResult<()> {
        let id = self.reference(id);
        self.disabled.insert(id);
        Ok(())
    }

    fn is_disabled(&self, id: Option<&str>) -> HostResult<bool> {
        Ok(self.disabled.contains(&self.reference(id)))
    }

    fn target_id(&self) -> HostResult<String> {
        Ok(self.target.clone())
    }

    fn is_script_running(&self, name: &str) -> HostResult<bool> {
        Ok(self.running.contains(&key(name)))
    }

    fn start_script(&mut self, name: &str, target: &str) -> HostResult<()> {
        let name = key(name);
        self.running.insert(name.clone());
        let Some(program) = self.scripts.get(&name).cloned() else {
            warn!(script = %name, "no program registered; marking it running only");
            return Ok(());
        };

        debug!(script = %name, target, "starting nested script");
        let saved_locals = mem::take(&mut self.locals);
        let saved_target = mem::replace(&mut self.target, target.to_string());
        let interpreter = self.interpreter;
        let result = interpreter.run(&program, self);
        self.locals = saved_locals;
        self.target = saved_target;
        result.map_err(HostError::from)
    }

    fn stop_script(&mut self, name: &str) -> HostResult<()> {
        self.running.remove(&key(name));
        Ok(())
    }

    fn pc_name(&self) -> HostResult<String> {
        Ok(self.pc_name.clone())
    }

    fn roll_dice(&mut self, limit: i32) -> HostResult<i32> {
        if limit <= 0 {
            return Ok(0);
        }
        Ok(self.rng.gen_range(0..limit))
    }
}

fn key(name: &str) -> String {
    name.to_ascii_lowercase()
}

/// Narrow a value to the range its type can hold.
fn narrow(var_type: VarType, value: Value) -> Value {
    match var_type {
        VarType::Short => Value::from(i32::from(value.integer() as i16)),
        VarType::Long | VarType::Float => value,
    }
}
