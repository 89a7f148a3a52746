//! Log output for the simulator.
//!
//! Kernel and simulator code log through the `log` facade. A
//! `tracing_subscriber` formatter collects those records and writes them to
//! stderr, so stdout carries only console output and reports.

use tracing_subscriber::filter::LevelFilter;

use crate::cli::LogLevel;

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Install the stderr subscriber and bridge `log` records into it.
///
/// Only the first call in a process has an effect.
pub fn init(level: LogLevel) {
    let installed = tracing_subscriber::fmt()
        .with_max_level(LevelFilter::from(level))
        .with_writer(std::io::stderr)
        .without_time()
        .try_init();
    if installed.is_err() {
        log::debug!("[SIM] Log subscriber already installed");
    }
}
