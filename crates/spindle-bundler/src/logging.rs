//! Logging utilities for spindle-bundler
//!
//! This module is only available with the `logging` feature.
//!
//! For library users: spindle emits tracing events - install your own subscriber.
//! For application developers: use these convenience functions.

use spindle_common::{LogLevel, StderrColor};
use std::io::IsTerminal;
use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Initialize spindle logging with the specified level
///
/// `RUST_LOG` takes precedence when it is set. Colors follow the terminal.
///
/// # Thread Safety
///
/// This function installs a global subscriber and should only be called once
/// per process. It is safe to call from multiple threads - only the first
/// call will take effect.
///
/// # Example
///
/// ```rust,no_run
/// use spindle_bundler::logging::init_logging;
/// use spindle_bundler::LogLevel;
///
/// init_logging(LogLevel::Warning);
/// ```
pub fn init_logging(level: LogLevel) {
    init_logging_with_color(level, StderrColor::IfTerminal);
}

/// Initialize logging with an explicit color preference
pub fn init_logging_with_color(level: LogLevel, color: StderrColor) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_filter()));
    install(filter, use_ansi(color));
}

/// Initialize logging from RUST_LOG environment variable
///
/// Falls back to the info level if RUST_LOG is not set or invalid.
///
/// # Example
///
/// ```rust,no_run
/// use spindle_bundler::logging::init_logging_from_env;
///
/// init_logging_from_env();
/// ```
pub fn init_logging_from_env() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(LogLevel::Info.as_filter()));
    install(filter, use_ansi(StderrColor::IfTerminal));
}

fn use_ansi(color: StderrColor) -> bool {
    match color {
        StderrColor::Always => true,
        StderrColor::Never => false,
        StderrColor::IfTerminal => std::io::stderr().is_terminal(),
    }
}

fn install(filter: EnvFilter, ansi: bool) {
    INIT.call_once(|| {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .compact()
                    .with_target(false)
                    .without_time() // Let consumers control timestamp format
                    .with_ansi(ansi)
                    .with_writer(std::io::stderr),
            )
            .init();
    });
}
