use log::{debug, error, info, log_enabled, warn, Level};

/// Initializes the logger with the `env_logger` crate.
///
/// Respects `RUST_LOG`; the CLI's `--debug` and `--quiet` flags adjust the
/// filter before calling this (see `main.rs`) rather than gating each call
/// site by hand.
pub fn init_logger() {
    env_logger::init();
}

/// Builds and installs an `env_logger` with an explicit default filter,
/// used by the CLI to honor `--debug` / `--quiet` without requiring the
/// user to set `RUST_LOG` themselves.
pub fn init_logger_with_default(default_filter: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

/// Logs an error message.
pub fn log_error(message: &str) {
    if log_enabled!(Level::Error) {
        error!("{message}");
    }
}

/// Logs a warning message.
pub fn log_warn(message: &str) {
    if log_enabled!(Level::Warn) {
        warn!("{message}");
    }
}

/// Logs an informational message.
pub fn log_info(message: &str) {
    if log_enabled!(Level::Info) {
        info!("{message}");
    }
}

/// Logs a debug message.
pub fn log_debug(message: &str) {
    if log_enabled!(Level::Debug) {
        debug!("{message}");
    }
}
