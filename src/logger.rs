//! Logging utilities
//!
//! Startup message, access logging in several formats, and error/warning
//! lines. Access and info lines go to stdout, errors and warnings to stderr.

mod format;

pub use format::AccessLogEntry;

use crate::config::ServerConfig;

/// Print the one-line startup message.
///
/// Emitted exactly once, after the listener is bound and before the first
/// connection is accepted.
pub fn log_server_start(config: &ServerConfig) {
    println!(
        "Serving {} on {}",
        config.files.root.display(),
        config.display_url()
    );
}

pub fn log_error(message: &str) {
    eprintln!("[ERROR] {message}");
}

pub fn log_warning(message: &str) {
    eprintln!("[WARN] {message}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    eprintln!("[ERROR] Failed to serve connection: {err:?}");
}

/// Write one formatted access log line
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    println!("{}", entry.format(format));
}
