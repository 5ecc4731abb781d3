//! The client configuration, saved as `key=value` lines in
//! `~/.config/noclip/config`.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};

use crate::UsageError;

/// Environment variable that overrides the saved server URL
pub const SERVER_URL_ENV: &str = "NOCLIP_SERVER_URL";

const USER_ID: &str = "user_id";
const API_KEY: &str = "api_key";
const SERVER_URL: &str = "server_url";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub user_id: Option<String>,
    pub api_key: Option<String>,
    pub server_url: Option<String>,
}

impl ClientConfig {
    /// `~/.config/noclip/config`
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine your home directory")?;

        Ok(home.join(".config").join("noclip").join("config"))
    }

    /// Loads the config at `path`, or an empty one if the file doesn't exist yet
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => {
                Self::parse(&text).with_context(|| format!("Invalid config at {}", path.display()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut config = Self::default();

        for (number, line) in text.lines().enumerate() {
            let line = line.trim();

            if line.is_empty() {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                bail!("line {} is not a key=value pair", number + 1);
            };

            let value = Some(value.to_string());

            match key.trim() {
                USER_ID => config.user_id = value,
                API_KEY => config.api_key = value,
                SERVER_URL => config.server_url = value,
                // Unknown keys are left alone so newer configs still load
                _ => {}
            }
        }

        Ok(config)
    }

    pub fn to_file_contents(&self) -> String {
        [
            (USER_ID, &self.user_id),
            (API_KEY, &self.api_key),
            (SERVER_URL, &self.server_url),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_ref().map(|v| format!("{}={}\n", key, v)))
        .collect()
    }

    /// Writes the config, creating parent directories as needed.
    /// The file holds the api key, so on unix it is only readable by its owner.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        fs::write(path, self.to_file_contents())
            .with_context(|| format!("Failed to write {}", path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            fs::set_permissions(path, fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to restrict access to {}", path.display()))?;
        }

        Ok(())
    }

    /// The saved api key, or a usage error telling the user to register
    pub fn api_key(&self) -> Result<&str, UsageError> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                UsageError("Please register first using 'noclip register <user_id>'".to_string())
            })
    }

    /// Picks the server URL given on the command line or in the environment,
    /// falling back to the saved one
    pub fn resolve_server_url(&self, explicit: Option<&str>) -> Result<String, UsageError> {
        explicit
            .or(self.server_url.as_deref())
            .map(|url| url.trim().trim_end_matches('/'))
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                UsageError(format!(
                    "No server URL configured. Pass --server or set {}",
                    SERVER_URL_ENV
                ))
            })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse() {
        let config = ClientConfig::parse(
            "user_id=alice\napi_key=abc=def\n\nserver_url=http://localhost:8000\ncolor=blue\n",
        )
        .unwrap();

        assert_eq!(config.user_id.as_deref(), Some("alice"));
        // Only the first '=' separates key and value
        assert_eq!(config.api_key.as_deref(), Some("abc=def"));
        assert_eq!(config.server_url.as_deref(), Some("http://localhost:8000"));
    }

    #[test]
    fn test_parse_malformed_line() {
        let error = ClientConfig::parse("user_id=alice\noops\n").unwrap_err();

        assert!(error.to_string().contains("line 2"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config");

        let config = ClientConfig {
            user_id: Some("alice".to_string()),
            api_key: Some("secret".to_string()),
            server_url: None,
        };

        config.save(&path).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "user_id=alice\napi_key=secret\n"
        );
        assert_eq!(ClientConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();

        let config = ClientConfig::load(&dir.path().join("config")).unwrap();

        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_api_key_requires_registration() {
        let error = ClientConfig::default().api_key().unwrap_err();

        assert!(error.0.contains("noclip register"));
    }

    #[test]
    fn test_resolve_server_url() {
        let config = ClientConfig {
            server_url: Some("http://saved:8000/".to_string()),
            ..Default::default()
        };

        assert_eq!(
            config.resolve_server_url(Some("http://flag:9000")).unwrap(),
            "http://flag:9000"
        );
        assert_eq!(config.resolve_server_url(None).unwrap(), "http://saved:8000");
        assert!(ClientConfig::default().resolve_server_url(None).is_err());
        assert!(ClientConfig::default().resolve_server_url(Some("  ")).is_err());
    }
}
