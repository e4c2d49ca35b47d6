use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::provider::openaq::DEFAULT_BASE_URL;

pub const DEFAULT_BIND: &str = "0.0.0.0:8000";

/// Provider credentials and endpoint.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self { api_key: None, base_url: default_base_url() }
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

/// Connection parameters for the PostGIS database used by external tooling.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub name: String,
}

impl DatabaseConfig {
    pub fn connection_url(&self) -> String {
        format!(
            "postgresql://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.name
        )
    }

    /// Same as [`connection_url`](Self::connection_url) with the password masked.
    pub fn redacted_url(&self) -> String {
        format!("postgresql://{}:***@{}:{}/{}", self.user, self.host, self.port, self.name)
    }
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.redacted_url())
    }
}

/// Top-level configuration, loaded once at startup.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Example TOML:
    /// [provider]
    /// api_key = "..."
    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseConfig>,
}

impl Config {
    /// Load config from `path` (defaults if it doesn't exist), then apply environment overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut cfg = Self::read_file(path)?;
        cfg.apply_env(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    /// Read only the file at `path`, or return defaults if it doesn't exist yet.
    pub fn read_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Override file values with `OPENAQ_API_KEY`, `OPENAQ_BASE_URL`,
    /// `AIRQUALITY_BIND` and the `DB_*` variables.
    ///
    /// The database section is replaced only when all five `DB_*` values are set.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("OPENAQ_API_KEY").filter(|k| !k.is_empty()) {
            self.provider.api_key = Some(key);
        }
        if let Some(url) = lookup("OPENAQ_BASE_URL") {
            self.provider.base_url = url;
        }
        if let Some(bind) = lookup("AIRQUALITY_BIND") {
            self.server.bind = bind;
        }

        let db = (
            lookup("DB_USER"),
            lookup("DB_PASSWORD"),
            lookup("DB_HOST"),
            lookup("DB_PORT"),
            lookup("DB_NAME"),
        );
        if let (Some(user), Some(password), Some(host), Some(port), Some(name)) = db {
            let port = port
                .parse::<u16>()
                .with_context(|| format!("DB_PORT is not a valid port: {port}"))?;
            self.database = Some(DatabaseConfig { user, password, host, port, name });
        }

        Ok(())
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "airquality", "airquality-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.provider.api_key = Some(api_key);
    }

    pub fn has_api_key(&self) -> bool {
        self.provider.api_key.is_some()
    }

    /// Human-readable summary with secrets masked.
    pub fn summary(&self) -> String {
        let key = if self.has_api_key() { "set" } else { "not set" };
        let db = self
            .database
            .as_ref()
            .map(DatabaseConfig::redacted_url)
            .unwrap_or_else(|| "not configured".to_string());

        format!(
            "provider.base_url = {}\nprovider.api_key  = {}\nserver.bind       = {}\ndatabase          = {}",
            self.provider.base_url, key, self.server.bind, db
        )
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
