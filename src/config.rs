// Server configuration
// One value assembled at startup and handed explicitly to the server start
// routine; nothing here is mutated after boot.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Top-level configuration for one server process
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub listen: ListenConfig,
    pub files: FilesConfig,
    pub logging: LoggingConfig,
}

/// Listening endpoint
#[derive(Debug, Deserialize, Clone)]
pub struct ListenConfig {
    pub host: String,
    pub port: u16,
}

/// Static file serving options
#[derive(Debug, Deserialize, Clone)]
pub struct FilesConfig {
    /// Directory request paths are resolved against
    pub root: PathBuf,
    /// Files tried, in order, when a request path names a directory
    pub index_files: Vec<String>,
}

/// Logging options
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
    /// Access log format (combined, common, or json)
    pub access_log_format: String,
}

impl ServerConfig {
    /// Assemble the configuration from built-in defaults, with
    /// `STATICD_*` environment variables layered on top.
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Environment::with_prefix("STATICD"))
            .set_default("listen.host", "0.0.0.0")?
            .set_default("listen.port", 5173)?
            .set_default("files.root", ".")?
            .set_default(
                "files.index_files",
                vec!["index.html".to_string(), "index.htm".to_string()],
            )?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.listen.host, self.listen.port)
            .parse()
            .map_err(|e| format!("Invalid listen address: {e}"))
    }

    /// URL printed in the startup message
    pub fn display_url(&self) -> String {
        format!("http://localhost:{}/", self.listen.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: ListenConfig {
                host: "0.0.0.0".to_string(),
                port: 5173,
            },
            files: FilesConfig {
                root: PathBuf::from("."),
                index_files: vec!["index.html".to_string(), "index.htm".to_string()],
            },
            logging: LoggingConfig {
                access_log: true,
                access_log_format: "combined".to_string(),
            },
        }
    }
}
