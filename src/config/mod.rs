// Configuration module entry point
// Layered configuration: built-in defaults, optional config file, environment

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, LoggingConfig, PerformanceConfig, ServeConfig, ServerConfig};

/// Environment variable prefix, e.g. `DIRSERVE_SERVER__PORT=8080`
pub const ENV_PREFIX: &str = "DIRSERVE";

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// The file is optional; anything it leaves out keeps its default, and
    /// environment variables override both.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("serve.exclude")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::AccessLogFormat;
    use std::path::PathBuf;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.serve.root, PathBuf::from("."));
        assert_eq!(config.serve.exclude, vec!["node_modules"]);
        assert!(config.logging.access_log);
        assert_eq!(config.logging.access_log_format, AccessLogFormat::Combined);
        assert!(config.performance.connection_timeout.is_none());
        assert_eq!(
            config.get_socket_addr().unwrap(),
            "0.0.0.0:3000".parse().unwrap()
        );
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent");
        let config = Config::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("dirserve.toml"),
            r#"
[server]
port = 8081

[serve]
root = "/srv/media"
exclude = ["target"]

[logging]
access_log_format = "json"
"#,
        )
        .unwrap();

        let path = dir.path().join("dirserve");
        let config = Config::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.serve.root, PathBuf::from("/srv/media"));
        assert_eq!(config.serve.exclude, vec!["target"]);
        assert_eq!(config.logging.access_log_format, AccessLogFormat::Json);
    }

    #[test]
    fn test_unknown_log_format_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("bad.toml"),
            "[logging]\naccess_log_format = \"xml\"\n",
        )
        .unwrap();

        let path = dir.path().join("bad");
        assert!(Config::load_from(path.to_str().unwrap()).is_err());
    }

    #[test]
    fn test_invalid_address() {
        let mut config = Config::default();
        config.server.host = "not an address".to_string();
        assert!(config.get_socket_addr().is_err());
    }
}
