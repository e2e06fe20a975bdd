//! staticd - a small static file HTTP server
//!
//! Binds a TCP listener, serves files from a configured root directory,
//! and keeps running until externally terminated.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
