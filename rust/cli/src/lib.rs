//! # gtolens CLI Library
//!
//! Command-line front end for the gtolens engine: evaluates PLO hand
//! histories against a solved-game store and turns the results into review
//! tables.
//!
//! ## Main Entry Point
//!
//! The primary entry point is the [`run`] function, which parses command-line arguments
//! and executes the appropriate subcommand.
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::io;
//! let args = vec![
//!     "gtolens", "evaluate", "--input", "hands.txt", "--format", "pokerstars",
//!     "--store", "plo.db", "--output", "results.jsonl",
//! ];
//! let code = gtolens_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `evaluate`: Score every hero decision and write JSONL results
//! - `inspect`: List decision points without a store
//! - `export`: Convert results to CSV, JSON or SQLite
//! - `stats`: Summarize results
//! - `cfg`: Display current configuration settings

use clap::Parser;
use std::io::Write;
pub mod cli;
mod commands;
mod config;
mod error;
pub mod exit_code;
pub mod io_utils;
pub mod logging;
pub mod store;
pub mod ui;

use cli::{Commands, GtolensCli};
use commands::{
    handle_cfg_command, handle_evaluate_command, handle_export_command, handle_inspect_command,
    handle_stats_command,
};
use config::Overrides;

pub use commands::{EXPORT_COLUMNS, ExportRow, Tally};
pub use error::CliError;

const COMMANDS: &[&str] = &["evaluate", "inspect", "export", "stats", "cfg"];

/// Main entry point for the CLI application.
///
/// Parses command-line arguments and dispatches to the appropriate subcommand handler.
///
/// # Returns
///
/// Exit code: `0` for success (including runs with skipped decision points),
/// `2` for errors
///
/// # Example
///
/// ```
/// use std::io;
/// let code = gtolens_cli::run(["gtolens", "--help"], &mut io::sink(), &mut io::sink());
/// assert_eq!(code, 0);
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let parsed = GtolensCli::try_parse_from(&argv);
    match parsed {
        Err(e) => {
            use clap::error::ErrorKind;

            // Help and version should print to stdout and exit 0
            match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    if write!(out, "{}", e).is_err() {
                        return exit_code::ERROR;
                    }
                    exit_code::SUCCESS
                }
                _ => {
                    if writeln!(err, "{}", e).is_err()
                        || writeln!(err).is_err()
                        || writeln!(err, "gtolens PLO decision review").is_err()
                        || writeln!(err, "Usage: gtolens <command> [options]\n").is_err()
                        || writeln!(err, "Commands:").is_err()
                    {
                        return exit_code::ERROR;
                    }
                    for c in COMMANDS {
                        if writeln!(err, "  {}", c).is_err() {
                            return exit_code::ERROR;
                        }
                    }
                    if writeln!(err, "\nFor full help, run: gtolens --help").is_err() {
                        return exit_code::ERROR;
                    }
                    exit_code::ERROR
                }
            }
        }
        Ok(cli) => {
            logging::init(cli.verbose);
            let result = match cli.cmd {
                Commands::Cfg => handle_cfg_command(out, err),
                Commands::Evaluate {
                    input,
                    format,
                    store,
                    output,
                    hero,
                    rake,
                    stack_bb,
                    flop,
                } => {
                    let overrides = Overrides {
                        rake,
                        default_stack_bb: stack_bb,
                        hero,
                        store,
                        flop_decisions: flop,
                    };
                    handle_evaluate_command(input, format.into(), output, overrides, out, err)
                }
                Commands::Inspect {
                    input,
                    format,
                    hero,
                    flop,
                } => {
                    let overrides = Overrides {
                        hero,
                        flop_decisions: flop,
                        ..Overrides::default()
                    };
                    handle_inspect_command(input, format.into(), overrides, out, err)
                }
                Commands::Export {
                    input,
                    format,
                    output,
                } => handle_export_command(input, output, format, out, err),
                Commands::Stats { input } => handle_stats_command(input, out, err),
            };
            match result {
                Ok(()) => exit_code::SUCCESS,
                Err(e) => {
                    if writeln!(err, "Error: {}", e).is_err() {
                        return exit_code::ERROR;
                    }
                    exit_code::ERROR
                }
            }
        }
    }
}
