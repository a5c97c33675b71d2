// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub http: HttpConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Worker threads for the runtime; `None` means one per CPU core
    pub workers: Option<usize>,
    /// Listen backlog passed to the socket
    pub backlog: i32,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    /// Log every accepted request/response pair
    pub access_log: bool,
    pub access_log_file: Option<String>,
    pub error_log_file: Option<String>,
}

/// HTTP emission configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Attach a `Server: servkit/<version>` header to every response
    pub server_header: bool,
    /// Re-raise emission errors instead of logging and closing (development)
    pub strict_errors: bool,
    /// Transfer engine buffer size in bytes
    pub chunk_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                workers: None,
                backlog: 128,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                access_log: true,
                access_log_file: None,
                error_log_file: None,
            },
            http: HttpConfig {
                server_header: true,
                strict_errors: false,
                chunk_size: 4096,
            },
        }
    }
}
