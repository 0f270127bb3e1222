//! Escape token expansion in message, book and dialogue text.
//!
//! A `%` or `^` followed by a known token is replaced with host-provided
//! text: `^pcname` becomes the player's name, `%actionjump` the key bound
//! to jumping. Tokens are matched case-insensitively as a prefix of what
//! follows the escape, so `%PCName's` expands to the name followed by
//! `'s`. When no fixed token matches, global variable names are tried,
//! longest first; a matching global the host reports no type for expands to
//! nothing. A braced form `%{token}` matches `token` exactly and
//! consumes the braces.
//!
//! Anything unresolved is left as is. A host failure during a substitution
//! is logged and treated as unresolved.

use crate::context::{Context, VarType};
use crate::error::HostResult;
use crate::format::fixed;
use tracing::{debug, error};

/// Which kind of text is being expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinesMode {
    /// Dialogue: `%name`, `%class`, `%rank` and friends refer to the NPC
    /// being spoken to.
    Dialogue,
    MessageBox,
    /// Same rules as message boxes.
    Book,
}

/// Upper bound on the text examined after an escape character.
const LOOKAHEAD: usize = 100;

#[derive(Debug, Clone, Copy)]
enum Source {
    Binding(&'static str),
    PcBounty,
    PcClass,
    PcRace,
    PcName,
    PcRank,
    PcNextRank,
    Cell,
    NpcFaction,
    NpcRank,
    NpcClass,
    NpcRace,
    ActorName,
    /// Recognised but expands to nothing.
    Nothing,
}

// Order matters: the first prefix match wins.
const COMMON_TOKENS: &[(&str, Source)] = &[
    ("actionslideright", Source::Binding("#{sRight}")),
    ("actionreadymagic", Source::Binding("#{sReady_Magic}")),
    ("actionprevweapon", Source::Binding("#{sPrevWeapon}")),
    ("actionnextweapon", Source::Binding("#{sNextWeapon}")),
    ("actiontogglerun", Source::Binding("#{sAuto_Run}")),
    ("actionslideleft", Source::Binding("#{sLeft}")),
    ("actionreadyitem", Source::Binding("#{sReady_Weapon}")),
    ("actionprevspell", Source::Binding("#{sPrevSpell}")),
    ("actionnextspell", Source::Binding("#{sNextSpell}")),
    ("actionrestmenu", Source::Binding("#{sRestKey}")),
    ("actionmenumode", Source::Binding("#{sInventory}")),
    ("actionactivate", Source::Binding("#{sActivate}")),
    ("actionjournal", Source::Binding("#{sJournal}")),
    ("actionforward", Source::Binding("#{sForward}")),
    ("pccrimelevel", Source::PcBounty),
    ("actioncrouch", Source::Binding("#{sCrouch_Sneak}")),
    ("actionjump", Source::Binding("#{sJump}")),
    ("actionback", Source::Binding("#{sBack}")),
    ("actionuse", Source::Binding("#{sUse}")),
    ("actionrun", Source::Binding("#{sRun}")),
    ("pcclass", Source::PcClass),
    ("pcrace", Source::PcRace),
    ("pcname", Source::PcName),
    ("cell", Source::Cell),
];

const DIALOGUE_TOKENS: &[(&str, Source)] = &[
    ("faction", Source::NpcFaction),
    ("nextpcrank", Source::PcNextRank),
    ("pcnextrank", Source::PcNextRank),
    ("pcrank", Source::PcRank),
    ("rank", Source::NpcRank),
    ("class", Source::NpcClass),
    ("race", Source::NpcRace),
    ("name", Source::ActorName),
];

const OTHER_TOKENS: &[(&str, Source)] = &[
    ("faction", Source::Nothing),
    ("nextpcrank", Source::Nothing),
    ("pcnextrank", Source::Nothing),
    ("pcrank", Source::Nothing),
    ("rank", Source::Nothing),
    ("class", Source::PcClass),
    ("race", Source::PcRace),
    ("name", Source::PcName),
];

impl Source {
    fn expand(self, context: &dyn Context) -> HostResult<String> {
        match self {
            Source::Binding(action) => context.action_binding(action),
            Source::PcBounty => context.pc_bounty().map(|b| b.to_string()),
            Source::PcClass => context.pc_class(),
            Source::PcRace => context.pc_race(),
            Source::PcName => context.pc_name(),
            Source::PcRank => context.pc_rank(),
            Source::PcNextRank => context.pc_next_rank(),
            Source::Cell => context.current_cell_name(),
            Source::NpcFaction => context.npc_faction(),
            Source::NpcRank => context.npc_rank(),
            Source::NpcClass => context.npc_class(),
            Source::NpcRace => context.npc_race(),
            Source::ActorName => context.actor_name(),
            Source::Nothing => Ok(String::new()),
        }
    }
}

/// How a candidate token is compared with the text after the escape.
#[derive(Clone, Copy)]
enum Match<'t> {
    /// The candidate must start the lowercased lookahead.
    Prefix(&'t str),
    /// The candidate must equal the lowercased braced token.
    Exact(&'t str),
}

impl Match<'_> {
    fn accepts(self, candidate: &str) -> bool {
        match self {
            Match::Prefix(text) => text.starts_with(candidate),
            Match::Exact(text) => text == candidate,
        }
    }
}

struct Expander<'c> {
    context: &'c dyn Context,
    mode: DefinesMode,
    globals: Option<Vec<String>>,
}

impl Expander<'_> {
    /// Expand the token introduced by `escape`. Returns the replacement and
    /// how many characters after the escape it consumed.
    fn expand(&mut self, escape: char, rest: &[char]) -> HostResult<Option<(String, usize)>> {
        if rest.first() == Some(&'{') {
            if let Some(close) = rest.iter().position(|&c| c == '}') {
                let token = lowercase(&rest[1..close]);
                if let Some((text, _)) = self.lookup(escape, Match::Exact(&token))? {
                    return Ok(Some((text, close + 1)));
                }
            }
        }
        let lookahead = lowercase(&rest[..rest.len().min(LOOKAHEAD)]);
        self.lookup(escape, Match::Prefix(&lookahead))
    }

    fn lookup(&mut self, escape: char, matcher: Match<'_>) -> HostResult<Option<(String, usize)>> {
        let mode_tokens = if escape == '%' && self.mode == DefinesMode::Dialogue {
            DIALOGUE_TOKENS
        } else {
            OTHER_TOKENS
        };
        for &(token, source) in COMMON_TOKENS.iter().chain(mode_tokens) {
            if matcher.accepts(token) {
                return Ok(Some((source.expand(self.context)?, token.len())));
            }
        }
        self.lookup_global(matcher)
    }

    fn lookup_global(&mut self, matcher: Match<'_>) -> HostResult<Option<(String, usize)>> {
        let context = self.context;
        let globals = match &mut self.globals {
            Some(globals) => globals,
            slot => {
                let mut names = context.globals()?;
                names.sort_by_key(|name| std::cmp::Reverse(name.chars().count()));
                slot.insert(names)
            }
        };
        for name in globals.iter() {
            let lower: String = name.chars().map(|c| c.to_ascii_lowercase()).collect();
            if !matcher.accepts(&lower) {
                continue;
            }
            let text = match context.global_type(name)? {
                Some(VarType::Short) => context.get_global_short(name)?.to_string(),
                Some(VarType::Long) => context.get_global_long(name)?.to_string(),
                Some(VarType::Float) => fixed(f64::from(context.get_global_float(name)?), 2),
                None => String::new(),
            };
            return Ok(Some((text, name.chars().count())));
        }
        Ok(None)
    }
}

fn lowercase(chars: &[char]) -> String {
    chars.iter().map(|c| c.to_ascii_lowercase()).collect()
}

/// Expand escape tokens in `text`.
pub fn fix_defines(text: &str, mode: DefinesMode, context: &dyn Context) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut expander = Expander {
        context,
        mode,
        globals: None,
    };
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        let escape = chars[i];
        if escape != '%' && escape != '^' {
            out.push(escape);
            i += 1;
            continue;
        }
        let rest = &chars[i + 1..];
        let resolved = expander.expand(escape, rest).unwrap_or_else(|err| {
            error!(%err, "failed to replace escape character");
            debug!(text, "full text");
            None
        });
        match resolved {
            Some((replacement, consumed)) => {
                out.push_str(&replacement);
                i += 1 + consumed;
            }
            None => {
                // The character after an unresolved escape is never itself
                // treated as an escape.
                out.push(escape);
                if let Some(&next) = rest.first() {
                    out.push(next);
                }
                i += 2;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HostError;
    use std::cell::Cell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Host {
        globals: HashMap<String, (VarType, f32)>,
        globals_calls: Cell<usize>,
        untyped: Vec<String>,
        fail_pc_race: bool,
    }

    impl Context for Host {
        fn pc_name(&self) -> HostResult<String> {
            Ok("Nerevar".into())
        }
        fn pc_class(&self) -> HostResult<String> {
            Ok("Nightblade".into())
        }
        fn pc_race(&self) -> HostResult<String> {
            if self.fail_pc_race {
                Err(HostError::new("no player"))
            } else {
                Ok("Dunmer".into())
            }
        }
        fn pc_rank(&self) -> HostResult<String> {
            Ok("Hireling".into())
        }
        fn pc_bounty(&self) -> HostResult<i32> {
            Ok(40)
        }
        fn actor_name(&self) -> HostResult<String> {
            Ok("Fargoth".into())
        }
        fn npc_class(&self) -> HostResult<String> {
            Ok("Commoner".into())
        }
        fn current_cell_name(&self) -> HostResult<String> {
            Ok("Seyda Neen".into())
        }
        fn action_binding(&self, action: &str) -> HostResult<String> {
            Ok(match action {
                "#{sJump}" => "E".into(),
                "#{sRun}" => "Shift".into(),
                other => format!("<{other}>"),
            })
        }
        fn globals(&self) -> HostResult<Vec<String>> {
            self.globals_calls.set(self.globals_calls.get() + 1);
            Ok(self.globals.keys().chain(&self.untyped).cloned().collect())
        }
        fn global_type(&self, name: &str) -> HostResult<Option<VarType>> {
            Ok(self.globals.get(name).map(|(t, _)| *t))
        }
        fn get_global_short(&self, name: &str) -> HostResult<i32> {
            Ok(self.globals[name].1 as i32)
        }
        fn get_global_long(&self, name: &str) -> HostResult<i32> {
            Ok(self.globals[name].1 as i32)
        }
        fn get_global_float(&self, name: &str) -> HostResult<f32> {
            Ok(self.globals[name].1)
        }
    }

    fn host_with_globals(globals: &[(&str, VarType, f32)]) -> Host {
        Host {
            globals: globals
                .iter()
                .map(|&(n, t, v)| (n.to_string(), (t, v)))
                .collect(),
            ..Host::default()
        }
    }

    #[test]
    fn player_tokens_case_insensitive() {
        let host = Host::default();
        assert_eq!(
            fix_defines("Hail, %PCName the ^pcrace.", DefinesMode::MessageBox, &host),
            "Hail, Nerevar the Dunmer."
        );
        assert_eq!(
            fix_defines("%pcclass in %cell", DefinesMode::Book, &host),
            "Nightblade in Seyda Neen"
        );
        assert_eq!(
            fix_defines("bounty %PCCrimeLevel", DefinesMode::MessageBox, &host),
            "bounty 40"
        );
    }

    #[test]
    fn action_bindings() {
        let host = Host::default();
        assert_eq!(
            fix_defines("Press %actionjump or ^actionrun", DefinesMode::MessageBox, &host),
            "Press E or Shift"
        );
        assert_eq!(
            fix_defines("%actiontogglerun", DefinesMode::MessageBox, &host),
            "<#{sAuto_Run}>"
        );
    }

    #[test]
    fn dialogue_tokens_refer_to_the_npc() {
        let host = Host::default();
        assert_eq!(
            fix_defines("%name the %class", DefinesMode::Dialogue, &host),
            "Fargoth the Commoner"
        );
        // Only '%' selects the NPC in dialogue.
        assert_eq!(fix_defines("^name", DefinesMode::Dialogue, &host), "Nerevar");
    }

    #[test]
    fn rank_tokens_vanish_outside_dialogue() {
        let host = Host::default();
        assert_eq!(
            fix_defines("[%rank] [%pcrank] %name", DefinesMode::MessageBox, &host),
            "[] [] Nerevar"
        );
        assert_eq!(fix_defines("%pcrank", DefinesMode::Dialogue, &host), "Hireling");
    }

    #[test]
    fn globals_longest_first() {
        let host = host_with_globals(&[
            ("gold", VarType::Long, 5.0),
            ("GoldCount", VarType::Short, 50.0),
            ("rate", VarType::Float, 0.5),
        ]);
        assert_eq!(
            fix_defines("%goldcount / %gold / %RATE", DefinesMode::MessageBox, &host),
            "50 / 5 / 0.50"
        );
        assert_eq!(host.globals_calls.get(), 1);
    }

    #[test]
    fn untyped_global_expands_to_nothing() {
        let mut host = host_with_globals(&[("gold", VarType::Long, 5.0)]);
        host.untyped.push("GoldCount".to_string());
        assert_eq!(
            fix_defines("[%goldcount] [%gold]", DefinesMode::MessageBox, &host),
            "[] [5]"
        );
    }

    #[test]
    fn braced_token_is_exact() {
        let host = host_with_globals(&[("Gold", VarType::Long, 50.0)]);
        assert_eq!(
            fix_defines("(%{name}) (%{Gold})", DefinesMode::MessageBox, &host),
            "(Nerevar) (50)"
        );
        // An unresolved braced token falls back to the plain rules.
        assert_eq!(
            fix_defines("%{unknown}", DefinesMode::MessageBox, &host),
            "%{unknown}"
        );
    }

    #[test]
    fn unresolved_escape_is_verbatim() {
        let host = Host::default();
        assert_eq!(
            fix_defines("%unknownToken and 50%", DefinesMode::MessageBox, &host),
            "%unknownToken and 50%"
        );
        assert_eq!(fix_defines("^^pcname", DefinesMode::MessageBox, &host), "^^pcname");
    }

    #[test]
    fn host_errors_leave_the_escape_in_place() {
        let host = Host {
            fail_pc_race: true,
            ..Host::default()
        };
        assert_eq!(
            fix_defines("%pcrace %pcname", DefinesMode::MessageBox, &host),
            "%pcrace Nerevar"
        );
    }
}
