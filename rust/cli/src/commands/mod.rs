//! Command handler modules for the gtolens CLI.
//!
//! Each command lives in its own file with a consistent pattern:
//!
//! - Public handler function: `pub fn handle_COMMAND_command(...) -> Result<(), CliError>`
//! - Output streams (`&mut dyn Write`) passed as parameters
//! - Errors propagated via the `CliError` enum

mod cfg;
mod evaluate;
mod export;
mod inspect;
mod stats;

pub use cfg::handle_cfg_command;
pub use evaluate::handle_evaluate_command;
pub use export::{COLUMNS as EXPORT_COLUMNS, ExportRow, handle_export_command};
pub use inspect::handle_inspect_command;
pub use stats::{Tally, handle_stats_command};
