//! Tracing subscriber for the CLI.
//!
//! Logs go to stderr so command output on stdout stays clean. `RUST_LOG`
//! overrides the default filter.

use std::io;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

fn build_filter_directives(is_dev: bool) -> Vec<String> {
    vec![
        if is_dev { "debug" } else { "info" }.to_string(),
        "reqwest=warn".to_string(),
        "hyper_util=warn".to_string(),
    ]
}

/// Registers the global subscriber. Call once, before any logging.
///
/// # Errors
///
/// Returns `Err` if a global subscriber is already registered.
pub fn init_tracing_subscriber(verbose: bool) -> anyhow::Result<()> {
    let is_dev = verbose || cfg!(debug_assertions);
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(build_filter_directives(is_dev).join(",")));

    let stderr_layer = fmt::layer()
        .with_level(true)
        .with_target(true)
        .with_ansi(cfg!(not(test)))
        .with_writer(io::stderr);

    registry().with(env_filter).with(stderr_layer).try_init()?;
    Ok(())
}
