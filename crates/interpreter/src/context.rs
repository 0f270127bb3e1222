//! The host callback interface.
//!
//! The interpreter never implements game behaviour. Every engine-visible
//! effect goes through a [`Context`] supplied by the host for the duration
//! of one `run`. All methods have a default that fails with
//! [`HostError::unsupported`], so a host implements only what it provides.

use crate::error::{HostError, HostResult};
use rand::Rng;

/// Storage type of a script variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarType {
    Short,
    Long,
    Float,
}

impl VarType {
    /// The single-letter tag used in compiled scripts and on the command
    /// line (`s`, `l`, `f`).
    pub fn letter(self) -> char {
        match self {
            VarType::Short => 's',
            VarType::Long => 'l',
            VarType::Float => 'f',
        }
    }

    pub fn from_letter(letter: char) -> Option<VarType> {
        match letter {
            's' => Some(VarType::Short),
            'l' => Some(VarType::Long),
            'f' => Some(VarType::Float),
            _ => None,
        }
    }
}

/// Host services available to running bytecode.
///
/// Shorts and longs are both carried as `i32`; narrowing a short is up to
/// the host. Member accessors take the id of the reference (or global
/// script) owning the variable, and `global` selects between the two.
#[allow(unused_variables)]
pub trait Context {
    // --- Locals ---

    fn get_local_short(&self, index: i32) -> HostResult<i32> {
        Err(HostError::unsupported("get_local_short"))
    }

    fn get_local_long(&self, index: i32) -> HostResult<i32> {
        Err(HostError::unsupported("get_local_long"))
    }

    fn get_local_float(&self, index: i32) -> HostResult<f32> {
        Err(HostError::unsupported("get_local_float"))
    }

    fn set_local_short(&mut self, index: i32, value: i32) -> HostResult<()> {
        Err(HostError::unsupported("set_local_short"))
    }

    fn set_local_long(&mut self, index: i32, value: i32) -> HostResult<()> {
        Err(HostError::unsupported("set_local_long"))
    }

    fn set_local_float(&mut self, index: i32, value: f32) -> HostResult<()> {
        Err(HostError::unsupported("set_local_float"))
    }

    // --- Globals ---

    fn get_global_short(&self, name: &str) -> HostResult<i32> {
        Err(HostError::unsupported("get_global_short"))
    }

    fn get_global_long(&self, name: &str) -> HostResult<i32> {
        Err(HostError::unsupported("get_global_long"))
    }

    fn get_global_float(&self, name: &str) -> HostResult<f32> {
        Err(HostError::unsupported("get_global_float"))
    }

    fn set_global_short(&mut self, name: &str, value: i32) -> HostResult<()> {
        Err(HostError::unsupported("set_global_short"))
    }

    fn set_global_long(&mut self, name: &str, value: i32) -> HostResult<()> {
        Err(HostError::unsupported("set_global_long"))
    }

    fn set_global_float(&mut self, name: &str, value: f32) -> HostResult<()> {
        Err(HostError::unsupported("set_global_float"))
    }

    /// Type of the named global, or `None` if there is no such global.
    fn global_type(&self, name: &str) -> HostResult<Option<VarType>> {
        Err(HostError::unsupported("global_type"))
    }

    /// Names of all globals.
    fn globals(&self) -> HostResult<Vec<String>> {
        Err(HostError::unsupported("globals"))
    }

    // --- Members ---

    fn get_member_short(&self, id: &str, name: &str, global: bool) -> HostResult<i32> {
        Err(HostError::unsupported("get_member_short"))
    }

    fn get_member_long(&self, id: &str, name: &str, global: bool) -> HostResult<i32> {
        Err(HostError::unsupported("get_member_long"))
    }

    fn get_member_float(&self, id: &str, name: &str, global: bool) -> HostResult<f32> {
        Err(HostError::unsupported("get_member_float"))
    }

    fn set_member_short(
        &mut self,
        id: &str,
        name: &str,
        value: i32,
        global: bool,
    ) -> HostResult<()> {
        Err(HostError::unsupported("set_member_short"))
    }

    fn set_member_long(
        &mut self,
        id: &str,
        name: &str,
        value: i32,
        global: bool,
    ) -> HostResult<()> {
        Err(HostError::unsupported("set_member_long"))
    }

    fn set_member_float(
        &mut self,
        id: &str,
        name: &str,
        value: f32,
        global: bool,
    ) -> HostResult<()> {
        Err(HostError::unsupported("set_member_float"))
    }

    // --- Messages and UI state ---

    /// Show `message` with the given button captions, in source order.
    fn message_box(&mut self, message: &str, buttons: &[String]) -> HostResult<()> {
        Err(HostError::unsupported("message_box"))
    }

    /// Show a report line. Defaults to a message box without buttons.
    fn report(&mut self, message: &str) -> HostResult<()> {
        self.message_box(message, &[])
    }

    fn menu_mode(&self) -> HostResult<bool> {
        Err(HostError::unsupported("menu_mode"))
    }

    /// Seconds elapsed since the previous frame.
    fn seconds_passed(&self) -> HostResult<f32> {
        Err(HostError::unsupported("seconds_passed"))
    }

    // --- References ---

    /// Enable `id`, or the script's own reference when `None`.
    fn enable(&mut self, id: Option<&str>) -> HostResult<()> {
        Err(HostError::unsupported("enable"))
    }

    fn disable(&mut self, id: Option<&str>) -> HostResult<()> {
        Err(HostError::unsupported("disable"))
    }

    fn is_disabled(&self, id: Option<&str>) -> HostResult<bool> {
        Err(HostError::unsupported("is_disabled"))
    }

    /// Id of the reference the running script is attached to.
    fn target_id(&self) -> HostResult<String> {
        Err(HostError::unsupported("target_id"))
    }

    /// Distance from `id` (or the script's own reference) to the reference
    /// named `name`.
    fn distance(&self, name: &str, id: Option<&str>) -> HostResult<f32> {
        Err(HostError::unsupported("distance"))
    }

    // --- Scripts ---

    fn is_script_running(&self, name: &str) -> HostResult<bool> {
        Err(HostError::unsupported("is_script_running"))
    }

    /// Start global script `name` targeting `target`. A host may run the
    /// script immediately, nested inside the current run.
    fn start_script(&mut self, name: &str, target: &str) -> HostResult<()> {
        Err(HostError::unsupported("start_script"))
    }

    fn stop_script(&mut self, name: &str) -> HostResult<()> {
        Err(HostError::unsupported("stop_script"))
    }

    // --- Text substitution ---

    fn pc_name(&self) -> HostResult<String> {
        Err(HostError::unsupported("pc_name"))
    }

    fn pc_race(&self) -> HostResult<String> {
        Err(HostError::unsupported("pc_race"))
    }

    fn pc_class(&self) -> HostResult<String> {
        Err(HostError::unsupported("pc_class"))
    }

    fn pc_rank(&self) -> HostResult<String> {
        Err(HostError::unsupported("pc_rank"))
    }

    fn pc_next_rank(&self) -> HostResult<String> {
        Err(HostError::unsupported("pc_next_rank"))
    }

    fn pc_bounty(&self) -> HostResult<i32> {
        Err(HostError::unsupported("pc_bounty"))
    }

    fn npc_faction(&self) -> HostResult<String> {
        Err(HostError::unsupported("npc_faction"))
    }

    fn npc_rank(&self) -> HostResult<String> {
        Err(HostError::unsupported("npc_rank"))
    }

    fn npc_class(&self) -> HostResult<String> {
        Err(HostError::unsupported("npc_class"))
    }

    fn npc_race(&self) -> HostResult<String> {
        Err(HostError::unsupported("npc_race"))
    }

    /// Name of the actor the script or dialogue is attached to.
    fn actor_name(&self) -> HostResult<String> {
        Err(HostError::unsupported("actor_name"))
    }

    /// Name of the key bound to an action, given the action's localisation
    /// key such as `"#{sJump}"`.
    fn action_binding(&self, action: &str) -> HostResult<String> {
        Err(HostError::unsupported("action_binding"))
    }

    fn current_cell_name(&self) -> HostResult<String> {
        Err(HostError::unsupported("current_cell_name"))
    }

    // --- Randomness ---

    /// A uniformly distributed integer in `[0, limit)`; 0 when `limit` is 0.
    ///
    /// `limit` is never negative. Override to make randomness
    /// deterministic.
    fn roll_dice(&mut self, limit: i32) -> HostResult<i32> {
        if limit <= 0 {
            return Ok(0);
        }
        Ok(rand::thread_rng().gen_range(0..limit))
    }
}
