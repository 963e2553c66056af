//! Logging utilities for the Fitbook application.
//!
//! Every crate logs through `tracing`; this module installs the subscriber
//! once at startup.

use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Crates whose events are shown at the configured level.
const FITBOOK_TARGETS: &[&str] = &[
    "fitbook_backend",
    "fitbook_booking",
    "fitbook_db",
    "fitbook_common",
    "fitbook_config",
];

/// Initialize the tracing subscriber with a specific log level.
///
/// `RUST_LOG` takes precedence when set. Otherwise the fitbook crates log at
/// `level` and HTTP request spans from `tower_http` at INFO. Calling this
/// twice is harmless; the second call leaves the first subscriber in place.
pub fn init_with_level(level: Level) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(level));

    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true),
        )
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}

/// Parses a level name from configuration, falling back to INFO.
pub fn parse_level(level: &str) -> Level {
    level.trim().parse::<Level>().unwrap_or(Level::INFO)
}

fn default_filter(level: Level) -> EnvFilter {
    let mut filter = EnvFilter::new("warn");
    for target in FITBOOK_TARGETS {
        if let Ok(directive) = format!("{}={}", target, level).parse() {
            filter = filter.add_directive(directive);
        }
    }
    if let Ok(directive) = "tower_http=info".parse() {
        filter = filter.add_directive(directive);
    }
    filter
}

/// Log a result, with different messages for success and error cases.
///
/// Returns the original result so it can be used in a chain.
pub fn log_result<T, E: std::fmt::Display>(
    result: Result<T, E>,
    success_message: &str,
    error_context: &str,
) -> Result<T, E> {
    match &result {
        Ok(_) => info!("{}", success_message),
        Err(e) => error!("{}: {}", error_context, e),
    }
    result
}
