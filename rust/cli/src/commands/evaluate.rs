//! Hand-history evaluation command.
//!
//! Runs the engine pipeline over one history file, writes one JSONL record
//! per scored decision and prints a JSON summary. Skipped segments and
//! decision points are reported but do not fail the command.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use gtolens_engine::formats::FormatKind;
use gtolens_engine::logger::ResultLogger;
use gtolens_engine::pipeline::Pipeline;
use tracing::info;

use crate::config::{self, Overrides};
use crate::error::CliError;
use crate::io_utils::{AutoSource, ensure_parent_dir};
use crate::store::StoreBackend;
use crate::ui;

pub fn handle_evaluate_command(
    input: String,
    format: FormatKind,
    output: String,
    overrides: Overrides,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let resolved = config::load_with_overrides(&overrides).map_err(|e| {
        let _ = ui::write_error(err, &format!("Invalid configuration: {}", e));
        CliError::Config(format!("Invalid configuration: {}", e))
    })?;
    let cfg = resolved.config;

    let Some(store_path) = cfg.store.clone() else {
        ui::write_error(err, "No store configured (use --store or GTOLENS_STORE)")?;
        return Err(CliError::Config("no store configured".into()));
    };
    let store = StoreBackend::open(&store_path).map_err(|e| {
        let _ = ui::write_error(err, &format!("Failed to open store {}: {}", store_path, e));
        CliError::from(e)
    })?;

    let pipeline = Pipeline::new(&store, cfg.pipeline_settings());
    let report = pipeline
        .evaluate_source(&AutoSource, Path::new(&input), format.parser())
        .map_err(|e| {
            let _ = ui::write_error(err, &e.to_string());
            CliError::from(e)
        })?;

    let output_path = Path::new(&output);
    ensure_parent_dir(output_path).map_err(|e| {
        let _ = ui::write_error(err, &e);
        CliError::InvalidInput(e)
    })?;
    let mut logger = ResultLogger::create(output_path).map_err(|e| {
        let _ = ui::write_error(err, &format!("Failed to write {}: {}", output, e));
        CliError::Io(e)
    })?;
    logger.write_all(&report.results)?;
    logger.flush()?;
    info!(
        input = %input,
        written = logger.written(),
        "evaluation finished"
    );

    let failures: BTreeMap<String, usize> = report
        .failures_by_kind()
        .into_iter()
        .map(|(kind, n)| (kind.to_string(), n))
        .collect();
    if !report.failures.is_empty() {
        ui::display_warning(
            err,
            &format!("Skipped {} item(s); see failures in the summary", report.failures.len()),
        )?;
    }

    let summary = serde_json::json!({
        "format": format.to_string(),
        "segments": report.segments,
        "decisions": report.decisions,
        "evaluated": report.results.len(),
        "skipped": report.failures.len(),
        "failures": failures,
        "output": output,
        "finished_at": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    });
    let json_output = serde_json::to_string_pretty(&summary)
        .map_err(|e| CliError::InvalidInput(format!("Failed to serialize summary: {}", e)))?;
    writeln!(out, "{}", json_output)?;
    Ok(())
}
