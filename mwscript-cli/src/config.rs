//! Run configuration aggregated from command-line flags and environment
//! variables.
//!
//! Resolved once before the interpreter starts; the console host reads it
//! without further parsing.

use mwscript_common::Value;
use mwscript_interpreter::VarType;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable consulted for `--seed` when the flag is absent.
pub const SEED_ENV: &str = "MWSCRIPT_SEED";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("run requires an input file")]
    MissingInput,

    #[error("{flag} requires a value")]
    MissingValue { flag: String },

    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("unexpected argument '{0}'")]
    UnexpectedArgument(String),

    #[error("invalid global '{0}' (expected name=s|l|f:value)")]
    InvalidGlobal(String),

    #[error("invalid script '{0}' (expected name=path)")]
    InvalidScript(String),

    #[error("invalid seed '{0}'")]
    InvalidSeed(String),
}

/// A global variable declared on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalSetting {
    pub name: String,
    pub var_type: VarType,
    pub value: Value,
}

impl GlobalSetting {
    /// Parse `name=t:value` where `t` is `s`, `l` or `f`.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidGlobal(text.to_string());
        let (name, typed) = text.split_once('=').ok_or_else(invalid)?;
        let (letter, value) = typed.split_once(':').ok_or_else(invalid)?;
        let mut letters = letter.chars();
        let var_type = match (letters.next(), letters.next()) {
            (Some(c), None) => VarType::from_letter(c).ok_or_else(invalid)?,
            _ => return Err(invalid()),
        };
        let value = match var_type {
            VarType::Short | VarType::Long => {
                Value::from_integer(value.parse().map_err(|_| invalid())?)
            }
            VarType::Float => Value::from_float(value.parse().map_err(|_| invalid())?),
        };
        if name.is_empty() {
            return Err(invalid());
        }
        Ok(Self {
            name: name.to_string(),
            var_type,
            value,
        })
    }
}

/// Complete configuration for `mwscript run`.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Program to run (binary, or assembly text ending in `.mws`).
    pub program: PathBuf,

    /// Globals known to the host (`--global`, repeatable).
    pub globals: Vec<GlobalSetting>,

    /// Programs started by name from `StartScript` (`--script`, repeatable).
    pub scripts: Vec<(String, PathBuf)>,

    /// Id of the reference the script runs on (`--target`).
    pub target: String,

    /// Player name for `%PCName` (`--pc-name`).
    pub pc_name: String,

    /// Value reported by `MenuMode` (`--menu-mode`).
    pub menu_mode: bool,

    /// Seed for `Random` (`--seed`, or `MWSCRIPT_SEED`).
    pub seed: Option<u64>,
}

impl RunConfig {
    /// Resolve configuration from `run` arguments and the environment.
    pub fn from_args(args: &[String]) -> Result<Self, ConfigError> {
        let mut program = None;
        let mut globals = Vec::new();
        let mut scripts = Vec::new();
        let mut target = "player".to_string();
        let mut pc_name = "Player".to_string();
        let mut menu_mode = false;
        let mut seed = None;

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            let mut value = |flag: &str| {
                iter.next().cloned().ok_or_else(|| ConfigError::MissingValue {
                    flag: flag.to_string(),
                })
            };
            match arg.as_str() {
                "--global" => globals.push(GlobalSetting::parse(&value("--global")?)?),
                "--script" => {
                    let pair = value("--script")?;
                    match pair.split_once('=') {
                        Some((name, path)) if !name.is_empty() && !path.is_empty() => {
                            scripts.push((name.to_string(), PathBuf::from(path)));
                        }
                        _ => return Err(ConfigError::InvalidScript(pair)),
                    }
                }
                "--target" => target = value("--target")?,
                "--pc-name" => pc_name = value("--pc-name")?,
                "--seed" => seed = Some(parse_seed(&value("--seed")?)?),
                "--menu-mode" => menu_mode = true,
                flag if flag.starts_with("--") => {
                    return Err(ConfigError::UnknownOption(flag.to_string()))
                }
                path if program.is_none() => program = Some(PathBuf::from(path)),
                extra => return Err(ConfigError::UnexpectedArgument(extra.to_string())),
            }
        }

        if seed.is_none() {
            seed = env_seed()?;
        }

        Ok(Self {
            program: program.ok_or(ConfigError::MissingInput)?,
            globals,
            scripts,
            target,
            pc_name,
            menu_mode,
            seed,
        })
    }
}

fn parse_seed(text: &str) -> Result<u64, ConfigError> {
    text.parse()
        .map_err(|_| ConfigError::InvalidSeed(text.to_string()))
}

fn env_seed() -> Result<Option<u64>, ConfigError> {
    match env::var(SEED_ENV) {
        Ok(text) if !text.trim().is_empty() => parse_seed(text.trim()).map(Some),
        _ => Ok(None),
    }
}
