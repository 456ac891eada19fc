use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the server URL
pub const SERVER_URL_ENV: &str = "POSTBOARD_SERVER_URL";

/// Server used when nothing else is configured
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

/// Server configuration stored locally
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub server_url: String,
    pub last_updated: chrono::DateTime<chrono::Utc>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            last_updated: chrono::Utc::now(),
        }
    }
}

/// Configuration manager for the `.postboard` directory
pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Manager rooted at `~/.postboard`, creating the directory if needed
    pub fn new() -> Result<Self> {
        let home_dir = dirs::home_dir().context("Could not determine home directory")?;
        Self::at(home_dir.join(".postboard"))
    }

    /// Manager rooted at an explicit directory
    pub fn at(config_dir: impl Into<PathBuf>) -> Result<Self> {
        let config_dir = config_dir.into();
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).context("Failed to create .postboard directory")?;
        }
        Ok(Self { config_dir })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    fn server_config_file(&self) -> PathBuf {
        self.config_dir.join("server_config.json")
    }

    /// Save server configuration
    pub fn save_server_config(&self, config: &ServerConfig) -> Result<()> {
        let json =
            serde_json::to_string_pretty(config).context("Failed to serialize server config")?;
        fs::write(self.server_config_file(), json)
            .context("Failed to write server config file")?;
        Ok(())
    }

    /// Load server configuration
    pub fn load_server_config(&self) -> Result<Option<ServerConfig>> {
        let config_file = self.server_config_file();
        if !config_file.exists() {
            return Ok(None);
        }

        let json =
            fs::read_to_string(&config_file).context("Failed to read server config file")?;
        let config: ServerConfig =
            serde_json::from_str(&json).context("Failed to parse server config")?;
        Ok(Some(config))
    }

    /// Remember a server URL for later runs
    pub fn save_server_url(&self, server_url: impl Into<String>) -> Result<()> {
        self.save_server_config(&ServerConfig {
            server_url: server_url.into(),
            last_updated: chrono::Utc::now(),
        })
    }

    /// Determine the server URL to use based on priority:
    /// 1. CLI argument (highest priority), remembered for later runs
    /// 2. Environment variable POSTBOARD_SERVER_URL
    /// 3. Saved configuration file
    /// 4. Built-in default
    pub fn determine_server_url(&self, cli_override: Option<String>) -> Result<String> {
        if let Some(url) = cli_override {
            if let Err(e) = self.save_server_url(url.as_str()) {
                log::warn!("Could not remember server URL {}: {}", url, e);
            }
            return Ok(url);
        }

        if let Ok(url) = std::env::var(SERVER_URL_ENV) {
            if !url.trim().is_empty() {
                return Ok(url);
            }
        }

        if let Some(config) = self.load_server_config()? {
            return Ok(config.server_url);
        }

        Ok(DEFAULT_SERVER_URL.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_cli_override_priority() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::at(temp_dir.path()).unwrap();
        manager.save_server_url("http://saved:8000").unwrap();

        let url = manager
            .determine_server_url(Some("http://cli-override:8000".to_string()))
            .unwrap();
        assert_eq!(url, "http://cli-override:8000");
    }

    #[test]
    fn test_cli_override_is_remembered() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::at(temp_dir.path()).unwrap();

        manager
            .determine_server_url(Some("http://cli-override:8000".to_string()))
            .unwrap();

        let reopened = ConfigManager::at(temp_dir.path()).unwrap();
        let saved = reopened.load_server_config().unwrap().unwrap();
        assert_eq!(saved.server_url, "http://cli-override:8000");
    }

    #[test]
    fn test_saved_config_and_env_priority() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::at(temp_dir.path()).unwrap();
        let original = env::var(SERVER_URL_ENV).ok();

        env::remove_var(SERVER_URL_ENV);
        assert_eq!(manager.determine_server_url(None).unwrap(), DEFAULT_SERVER_URL);

        manager.save_server_url("http://saved:8000").unwrap();
        assert_eq!(manager.determine_server_url(None).unwrap(), "http://saved:8000");

        env::set_var(SERVER_URL_ENV, "http://env-override:8000");
        assert_eq!(
            manager.determine_server_url(None).unwrap(),
            "http://env-override:8000"
        );

        match original {
            Some(value) => env::set_var(SERVER_URL_ENV, value),
            None => env::remove_var(SERVER_URL_ENV),
        }
    }

    #[test]
    fn test_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("nested").join(".postboard");
        let manager = ConfigManager::at(&dir).unwrap();
        assert!(manager.config_dir().exists());
        assert!(manager.load_server_config().unwrap().is_none());
    }
}
