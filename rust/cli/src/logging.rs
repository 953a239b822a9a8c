//! Diagnostic logging for the CLI.
//!
//! The engine emits `tracing` events (a debug line per segment and per
//! resolution step, a warning per skipped item). They go to stderr so that
//! stdout stays machine-readable.

use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVE: &str = "warn";
const VERBOSE_DIRECTIVE: &str = "debug";

/// `--verbose` wins over `RUST_LOG`, which wins over the default.
pub fn directive(verbose: bool, rust_log: Option<&str>) -> String {
    if verbose {
        return VERBOSE_DIRECTIVE.to_string();
    }
    match rust_log {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => DEFAULT_DIRECTIVE.to_string(),
    }
}

/// Installs the global subscriber. Later calls are no-ops, so `run` can be
/// invoked repeatedly in one process.
pub fn init(verbose: bool) {
    let env = std::env::var("RUST_LOG").ok();
    let filter = EnvFilter::try_new(directive(verbose, env.as_deref()))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
