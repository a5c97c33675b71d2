// Configuration module entry point
// Loads typed settings from config.toml plus environment overrides

mod types;

use std::net::SocketAddr;

pub use types::{Config, HttpConfig, LoggingConfig, ServerConfig};

impl Config {
    /// Load configuration from the given file path (extension optional).
    /// Missing file is fine; every key has a default. Environment variables
    /// prefixed `SERVKIT_` override file values (`SERVKIT_SERVER__PORT=80`).
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SERVKIT").separator("__"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.backlog", 128)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("http.server_header", true)?
            .set_default("http.strict_errors", false)?
            .set_default("http.chunk_size", 4096)?
            .build()?;

        settings.try_deserialize()
    }

    /// Load from the default `config.toml` next to the process.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = Config::load_from("definitely-not-a-config-file").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.http.chunk_size, 4096);
        assert!(!config.http.strict_errors);
        assert!(config.http.server_header);
    }

    #[test]
    fn test_socket_addr() {
        let config = Config::default();
        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn test_parse_toml_document() {
        let doc = r#"
            [server]
            host = "0.0.0.0"
            port = 9090
            workers = 2
            backlog = 64

            [logging]
            level = "debug"
            access_log = false

            [http]
            server_header = false
            strict_errors = true
            chunk_size = 8192
        "#;
        let config: Config = toml::from_str(doc).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.workers, Some(2));
        assert!(config.http.strict_errors);
        assert_eq!(config.http.chunk_size, 8192);
        assert!(config.logging.access_log_file.is_none());
    }
}
