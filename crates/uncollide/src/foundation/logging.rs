//! Logging utilities and structured logging support
//!
//! Runs log their start and finish at info level, each nudge pass and
//! expansion summary at debug level, and individual nudges at trace level.

pub use log::{debug, info, warn, error, trace, LevelFilter, SetLoggerError};

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize logging with an explicit level for this crate
///
/// `RUST_LOG` still applies to every other target. Fails if a logger is
/// already installed.
pub fn init_with_level(level: LevelFilter) -> Result<(), SetLoggerError> {
    env_logger::Builder::from_default_env()
        .filter_module("uncollide", level)
        .try_init()
}

/// Initialize logging for unit tests
///
/// Safe to call from every test; only the first call installs the logger.
pub fn init_for_tests() {
    let _ = env_logger::builder().is_test(true).try_init();
}
