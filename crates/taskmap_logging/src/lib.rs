#![deny(missing_docs)]
//! Logging facade shared by the taskmap crates.
//!
//! Library code logs through the `taskmap_*` macros so that the backend can be
//! chosen by the binary (or by the test initializer below).

use log::LevelFilter;

/// Logs a trace-level message through the global logging facade.
#[macro_export]
macro_rules! taskmap_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs a debug-level message through the global logging facade.
#[macro_export]
macro_rules! taskmap_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs an info-level message through the global logging facade.
#[macro_export]
macro_rules! taskmap_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a warn-level message through the global logging facade.
#[macro_export]
macro_rules! taskmap_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message through the global logging facade.
#[macro_export]
macro_rules! taskmap_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Default level: debug in debug builds, info in release builds.
pub fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Initializes a terminal logger for integration tests.
///
/// Safe to call from every test: a second initialization is ignored.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let _ = CombinedLogger::init(vec![TermLogger::new(
        default_level(),
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
