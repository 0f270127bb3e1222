//! mwscript CLI: assemble, disassemble and run compiled scripts.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Input/decode/assembly/usage error
//! - 2: Runtime error

mod commands;
mod config;
mod host;

use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    init_logging();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "assemble" => commands::assemble(&args[2..]),
        "disassemble" => commands::disassemble(&args[2..]),
        "run" => commands::run(&args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            process::exit(0);
        }
        other => {
            eprintln!("error: unknown command '{other}'");
            eprintln!();
            print_usage();
            process::exit(1);
        }
    };

    if let Err(code) = result {
        process::exit(code);
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_usage() {
    eprintln!("Usage: mwscript <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  assemble <input.mws> [-o output.mwsb]   Assemble text to binary");
    eprintln!("  disassemble <input.mwsb>                Disassemble binary to text");
    eprintln!("  run <input> [options]                   Execute a binary or .mws program");
    eprintln!();
    eprintln!("Run options:");
    eprintln!("  --global name=s|l|f:value   Declare a global (repeatable)");
    eprintln!("  --script name=path          Program started by StartScript (repeatable)");
    eprintln!("  --target id                 Reference the script runs on (default: player)");
    eprintln!("  --pc-name name              Player name for %PCName");
    eprintln!("  --menu-mode                 Report that a menu is open");
    eprintln!("  --seed n                    Seed for Random (or MWSCRIPT_SEED)");
    eprintln!();
    eprintln!("Logging is controlled by RUST_LOG (default: warn).");
}
