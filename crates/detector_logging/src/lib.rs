#![deny(missing_docs)]
//! Shared logging utilities for the job detector workspace.
//!
//! This crate provides the `detector_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. Every line is tagged
//! with the generation of the detection session that was current on the
//! logging thread, so interleaved navigations can be told apart in the log.

use std::cell::Cell;

#[doc(hidden)]
pub use log;

thread_local! {
    /// Generation of the detection session the current thread is working for.
    static SESSION_GENERATION: Cell<u64> = const { Cell::new(0) };
}

/// Sets the detection session generation for the current thread.
/// The coordinator calls this whenever a new session starts.
pub fn set_session_generation(generation: u64) {
    SESSION_GENERATION.with(|v| v.set(generation));
}

/// Retrieves the detection session generation for the current thread.
/// Returns 0 before any session has started.
pub fn session_generation() -> u64 {
    SESSION_GENERATION.with(|v| v.get())
}

/// Logs a trace-level message tagged with the current session generation.
#[macro_export]
macro_rules! detector_trace {
    ($($arg:tt)*) => {{
        $crate::log::trace!("[s{}] {}", $crate::session_generation(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message tagged with the current session generation.
#[macro_export]
macro_rules! detector_debug {
    ($($arg:tt)*) => {{
        $crate::log::debug!("[s{}] {}", $crate::session_generation(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message tagged with the current session generation.
#[macro_export]
macro_rules! detector_info {
    ($($arg:tt)*) => {{
        $crate::log::info!("[s{}] {}", $crate::session_generation(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message tagged with the current session generation.
#[macro_export]
macro_rules! detector_warn {
    ($($arg:tt)*) => {{
        $crate::log::warn!("[s{}] {}", $crate::session_generation(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message tagged with the current session generation.
#[macro_export]
macro_rules! detector_error {
    ($($arg:tt)*) => {{
        $crate::log::error!("[s{}] {}", $crate::session_generation(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

#[cfg(test)]
mod tests {
    use super::{session_generation, set_session_generation};

    #[test]
    fn generation_is_thread_local() {
        set_session_generation(7);
        assert_eq!(session_generation(), 7);
        let other = std::thread::spawn(session_generation).join().unwrap();
        assert_eq!(other, 0);
    }

    #[test]
    fn macros_accept_format_arguments() {
        super::initialize_for_tests();
        detector_info!("mounted {} after {}ms", "x.com-1", 1500);
        detector_debug!("plain message");
    }
}
