//! API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                    | Default                                          |
//! |-----------------------------|--------------------------------------------------|
//! | `PETHUB_HOST`               | `0.0.0.0`                                        |
//! | `PETHUB_PORT`               | `8000`                                           |
//! | `PETHUB_DATABASE_PATH`      | `./pethub.db`                                    |
//! | `PETHUB_DB_MAX_CONNECTIONS` | `5`                                              |
//! | `PETHUB_ALLOWED_ORIGINS`    | `http://localhost:3000,http://127.0.0.1:3000`    |

use std::env;
use std::path::PathBuf;

const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Interface to bind
    pub host: String,

    /// HTTP port
    pub port: u16,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Upper bound on pooled SQLite connections
    pub db_max_connections: u32,

    /// Origins allowed by CORS
    pub allowed_origins: Vec<String>,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = ApiConfig {
            host: lookup("PETHUB_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),

            port: lookup("PETHUB_PORT")
                .unwrap_or_else(|| "8000".to_string())
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PETHUB_PORT".to_string()))?,

            database_path: PathBuf::from(
                lookup("PETHUB_DATABASE_PATH").unwrap_or_else(|| "./pethub.db".to_string()),
            ),

            db_max_connections: lookup("PETHUB_DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| "5".to_string())
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PETHUB_DB_MAX_CONNECTIONS".to_string()))?,

            allowed_origins: lookup("PETHUB_ALLOWED_ORIGINS")
                .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string())
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect(),
        };

        if config.database_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingRequired("PETHUB_DATABASE_PATH".to_string()));
        }

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("PETHUB_DB_MAX_CONNECTIONS".to_string()));
        }

        if config
            .allowed_origins
            .iter()
            .any(|o| !(o.starts_with("http://") || o.starts_with("https://")))
        {
            return Err(ConfigError::InvalidValue("PETHUB_ALLOWED_ORIGINS".to_string()));
        }

        Ok(config)
    }

    /// Returns the `host:port` pair to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:8000");
        assert_eq!(config.database_path, PathBuf::from("./pethub.db"));
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(
            config.allowed_origins,
            vec!["http://localhost:3000", "http://127.0.0.1:3000"]
        );
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("PETHUB_HOST", "127.0.0.1"),
            ("PETHUB_PORT", "9090"),
            ("PETHUB_DATABASE_PATH", "/var/lib/pethub/shop.db"),
            ("PETHUB_ALLOWED_ORIGINS", "https://loja.example.com, ,http://localhost:5173"),
        ])
        .unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:9090");
        assert_eq!(config.database_path, PathBuf::from("/var/lib/pethub/shop.db"));
        assert_eq!(
            config.allowed_origins,
            vec!["https://loja.example.com", "http://localhost:5173"]
        );
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[("PETHUB_PORT", "eighty")]),
            Err(ConfigError::InvalidValue(ref key)) if key == "PETHUB_PORT"
        ));
        assert!(matches!(
            load(&[("PETHUB_DB_MAX_CONNECTIONS", "0")]),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            load(&[("PETHUB_ALLOWED_ORIGINS", "localhost:3000")]),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            load(&[("PETHUB_DATABASE_PATH", "")]),
            Err(ConfigError::MissingRequired(_))
        ));
    }
}
