use std::{env, fmt};

use thiserror::Error;

pub const DEFAULT_HOST: &str = "0.0.0.0";
/// The default port the server will listen on.
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://noclip.db";

/// Everything the server needs to start, read once at process start.
#[derive(Clone)]
pub struct ServerConfig {
    /// Must be present, but nothing signs with it yet
    pub secret_key: String,
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Enables debug logging
    pub debug: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} must be {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

impl ServerConfig {
    pub const SECRET_KEY: &'static str = "NOCLIP_SECRET_KEY";
    pub const DATABASE_URL: &'static str = "NOCLIP_DATABASE_URL";
    pub const HOST: &'static str = "NOCLIP_HOST";
    pub const PORT: &'static str = "NOCLIP_PORT";
    pub const DEBUG: &'static str = "NOCLIP_DEBUG";

    /// Reads the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name to its value
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret_key = lookup(Self::SECRET_KEY)
            .filter(|x| !x.is_empty())
            .ok_or(ConfigError::Missing(Self::SECRET_KEY))?;

        let port = match lookup(Self::PORT) {
            Some(value) => value.parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: Self::PORT,
                expected: "a port number",
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let debug = match lookup(Self::DEBUG) {
            Some(value) => parse_flag(&value).ok_or(ConfigError::Invalid {
                name: Self::DEBUG,
                expected: "a boolean",
                value,
            })?,
            None => false,
        };

        Ok(Self {
            secret_key,
            database_url: lookup(Self::DATABASE_URL)
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            host: lookup(Self::HOST).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            debug,
        })
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("secret_key", &"<redacted>")
            .field("database_url", &self.database_url)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("debug", &self.debug)
            .finish()
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[("NOCLIP_SECRET_KEY", "hunter2")]).unwrap();

        assert_eq!(config.secret_key, "hunter2");
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(!config.debug);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("NOCLIP_SECRET_KEY", "hunter2"),
            ("NOCLIP_DATABASE_URL", "sqlite::memory:"),
            ("NOCLIP_HOST", "127.0.0.1"),
            ("NOCLIP_PORT", "9050"),
            ("NOCLIP_DEBUG", "TRUE"),
        ])
        .unwrap();

        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9050);
        assert!(config.debug);
    }

    #[test]
    fn test_secret_key_is_required() {
        assert!(matches!(
            config(&[]),
            Err(ConfigError::Missing("NOCLIP_SECRET_KEY"))
        ));
        assert!(matches!(
            config(&[("NOCLIP_SECRET_KEY", "")]),
            Err(ConfigError::Missing(_))
        ));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            config(&[("NOCLIP_SECRET_KEY", "x"), ("NOCLIP_PORT", "eighty")]),
            Err(ConfigError::Invalid {
                name: "NOCLIP_PORT",
                ..
            })
        ));
        assert!(matches!(
            config(&[("NOCLIP_SECRET_KEY", "x"), ("NOCLIP_DEBUG", "maybe")]),
            Err(ConfigError::Invalid {
                name: "NOCLIP_DEBUG",
                ..
            })
        ));
    }

    #[test]
    fn test_debug_output_hides_secret() {
        let config = config(&[("NOCLIP_SECRET_KEY", "hunter2")]).unwrap();

        assert!(!format!("{:?}", config).contains("hunter2"));
    }
}
