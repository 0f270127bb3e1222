//! CLI command implementations.

use crate::config::RunConfig;
use crate::host::ConsoleContext;
use mwscript_common::Program;
use mwscript_interpreter::Interpreter;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info};

/// Extension of assembly text files; anything else is read as binary.
const TEXT_EXTENSION: &str = "mws";

/// Assemble a .mws text file to a .mwsb binary.
pub fn assemble(args: &[String]) -> Result<(), i32> {
    if args.is_empty() {
        eprintln!("error: assemble requires an input file");
        eprintln!("Usage: mwscript assemble <input.mws> [-o output.mwsb]");
        return Err(1);
    }

    let input = &args[0];

    let output = match args.get(1).map(String::as_str) {
        Some("-o") => match args.get(2) {
            Some(path) => path.clone(),
            None => {
                eprintln!("error: -o requires a path");
                return Err(1);
            }
        },
        Some(other) => {
            eprintln!("error: unexpected argument '{other}'");
            return Err(1);
        }
        None if input.ends_with(".mws") => format!("{input}b"),
        None => format!("{input}.mwsb"),
    };

    let program = read_text(input)?;
    let bytes = program.encode();

    fs::write(&output, &bytes).map_err(|e| {
        eprintln!("error: cannot write '{output}': {e}");
        1
    })?;

    eprintln!(
        "assembled {} instructions ({} bytes) -> {output}",
        program.instruction_count(),
        bytes.len()
    );
    Ok(())
}

/// Disassemble a .mwsb binary to text.
pub fn disassemble(args: &[String]) -> Result<(), i32> {
    if args.is_empty() {
        eprintln!("error: disassemble requires an input file");
        eprintln!("Usage: mwscript disassemble <input.mwsb>");
        return Err(1);
    }

    let program = read_binary(&args[0])?;
    print!("{}", mwscript_assembler::disassemble(&program));
    Ok(())
}

/// Execute a program on the console host.
pub fn run(args: &[String]) -> Result<(), i32> {
    let config = RunConfig::from_args(args).map_err(|e| {
        eprintln!("error: {e}");
        eprintln!("Usage: mwscript run <input.mwsb> [options]");
        1
    })?;
    debug!(?config, "resolved run configuration");

    let program = load_program(&config.program)?;
    let interpreter = Interpreter::new();
    let stdout = io::stdout();
    let mut host = ConsoleContext::new(&interpreter, &config, stdout.lock());
    for (name, path) in &config.scripts {
        host.add_script(name, load_program(path)?);
    }

    info!(
        program = %config.program.display(),
        instructions = program.instruction_count(),
        "running"
    );
    interpreter.run(&program, &mut host).map_err(|e| {
        eprintln!("runtime error: {e}");
        2
    })
}

// --- Helpers ---

/// Load a program, assembling it first when the file is assembly text.
fn load_program(path: &Path) -> Result<Program, i32> {
    let display = path.display().to_string();
    if path.extension().is_some_and(|ext| ext == TEXT_EXTENSION) {
        read_text(&display)
    } else {
        read_binary(&display)
    }
}

/// Read and assemble a .mws text file.
fn read_text(path: &str) -> Result<Program, i32> {
    let text = fs::read_to_string(path).map_err(|e| {
        eprintln!("error: cannot read '{path}': {e}");
        1
    })?;

    mwscript_assembler::assemble(&text).map_err(|e| {
        eprintln!("error: {path}: {e}");
        1
    })
}

/// Read and decode a .mwsb binary file.
fn read_binary(path: &str) -> Result<Program, i32> {
    let bytes = fs::read(path).map_err(|e| {
        eprintln!("error: cannot read '{path}': {e}");
        1
    })?;

    Program::decode(&bytes).map_err(|e| {
        eprintln!("error: invalid binary: {e}");
        1
    })
}
