//! Logging utilities
//!
//! Provides logging setup and configuration.

use env_logger::Env;

/// Setup logging for the client (env_logger picks up the RUST_LOG environment variable).
///
/// Safe to call more than once; returns `false` if a logger was already installed.
pub fn setup_logging() -> bool {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .try_init()
        .is_ok()
}

/// Setup logging for tests, routing output through the test harness capture.
pub fn setup_test_logging() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("debug"))
        .is_test(true)
        .try_init();
}
