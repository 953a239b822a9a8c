//! Configuration command handler.
//!
//! Prints the resolved configuration as JSON, each value paired with the
//! layer it came from (`default`, `file`, `env` or `cli`).
//!
//! # Example Output
//!
//! ```json
//! {
//!   "rake": {
//!     "value": 500,
//!     "source": "default"
//!   },
//!   ...
//! }
//! ```

use crate::config;
use crate::error::CliError;
use crate::ui;
use std::io::Write;

pub fn handle_cfg_command(out: &mut dyn Write, err: &mut dyn Write) -> Result<(), CliError> {
    let resolved = match config::load_with_sources() {
        Ok(r) => r,
        Err(e) => {
            ui::write_error(err, &format!("Invalid configuration: {}", e))?;
            return Err(CliError::Config(format!("Invalid configuration: {}", e)));
        }
    };

    let config::ConfigResolved { config, sources } = resolved;
    let display = serde_json::json!({
        "rake": {
            "value": config.rake,
            "source": sources.rake,
        },
        "default_stack_bb": {
            "value": config.default_stack_bb,
            "source": sources.default_stack_bb,
        },
        "hero": {
            "value": config.hero,
            "source": sources.hero,
        },
        "store": {
            "value": config.store,
            "source": sources.store,
        },
        "flop_decisions": {
            "value": config.flop_decisions,
            "source": sources.flop_decisions,
        }
    });
    let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}
