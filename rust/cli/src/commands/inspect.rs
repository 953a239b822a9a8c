//! Decision-point listing without a store.
//!
//! One JSON line per hand segment: the parsed hand and the lookup path of
//! every hero decision, or the reason the segment could not be parsed.

use std::io::Write;
use std::path::Path;

use gtolens_engine::decision::extract_decisions;
use gtolens_engine::formats::FormatKind;
use gtolens_engine::store::TextSource;
use serde_json::{Value, json};

use crate::config::{self, Overrides};
use crate::error::CliError;
use crate::io_utils::AutoSource;
use crate::ui;

pub fn handle_inspect_command(
    input: String,
    format: FormatKind,
    overrides: Overrides,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let cfg = config::load_with_overrides(&overrides)
        .map_err(|e| {
            let _ = ui::write_error(err, &format!("Invalid configuration: {}", e));
            CliError::Config(format!("Invalid configuration: {}", e))
        })?
        .config;

    let lines = AutoSource.read_lines(Path::new(&input)).map_err(|e| {
        let _ = ui::write_error(err, &e.to_string());
        CliError::from(e)
    })?;

    let parser = format.parser();
    let hero = cfg.hero.clone().or_else(|| parser.identify_hero(&lines));
    let mut malformed = 0usize;

    for segment in parser.segment(&lines) {
        let record = match parser.extract(&segment, hero.as_deref()) {
            Ok(hand) => {
                let decisions: Vec<Value> = extract_decisions(&hand, cfg.flop_decisions)
                    .iter()
                    .map(|dp| {
                        json!({
                            "index": dp.index,
                            "path": dp.lookup_path().to_string(),
                            "hero_move": dp.hero_move,
                            "opportunity": dp.opportunity,
                        })
                    })
                    .collect();
                json!({
                    "segment": segment.index,
                    "hand_id": hand.hand_id,
                    "hero": hand.hero,
                    "hole_cards": hand.hole_cards.canonical().to_string(),
                    "position": hand.position,
                    "players": hand.players,
                    "flop": hand.flop.map(|f| f.canonical().to_string()),
                    "decisions": decisions,
                })
            }
            Err(e) => {
                malformed += 1;
                json!({ "segment": segment.index, "error": e.to_string() })
            }
        };
        writeln!(out, "{}", record)?;
    }

    if malformed > 0 {
        ui::display_warning(err, &format!("{} malformed segment(s)", malformed))?;
    }
    Ok(())
}
