//! # Logging
//!
//! The full-screen UI owns the terminal, so trace output only goes to a file.
//! Without a log file no subscriber is installed and `tracing` macros are no-ops.

use crate::config::LOG_LEVEL_ENV_VAR;
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{fmt::time::ChronoLocal, EnvFilter};

/// Crates whose chatter is capped at `warn`
const QUIET_CRATES: [&str; 6] = ["reqwest", "hyper", "hyper_util", "rustls", "tokio", "mio"];

/// Build the filter from `CODEPAD_LOG_LEVEL`, defaulting to `info`
pub fn build_env_filter() -> Result<EnvFilter> {
    let mut filter = EnvFilter::try_from_env(LOG_LEVEL_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    for name in QUIET_CRATES {
        filter = filter.add_directive(format!("{name}=warn").parse()?);
    }
    Ok(filter)
}

/// Install the subscriber when a log file is given.
///
/// Returns whether a subscriber was installed.
pub fn init_tracing(log_file: Option<&str>) -> Result<bool> {
    let Some(path) = log_file else {
        return Ok(false);
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file '{path}'"))?;

    tracing_subscriber::fmt()
        .with_env_filter(build_env_filter()?)
        .with_timer(ChronoLocal::rfc_3339())
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!("cannot install tracing subscriber: {e}"))?;
    Ok(true)
}
