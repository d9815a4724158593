use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub quotes: QuoteApiConfig,

    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Event bus buffer size (default: 100)
    pub event_bus_buffer_size: usize,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/quotarr.db".to_string(),
            log_level: "info".to_string(),
            event_bus_buffer_size: 100,
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteApiConfig {
    pub base_url: String,

    /// Number of quotes requested on a full refresh (default: 12)
    pub fetch_count: u32,

    /// Request timeout in seconds (default: 30)
    pub request_timeout_seconds: u32,
}

impl Default for QuoteApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://thesimpsonsquoteapi.glitch.me".to_string(),
            fetch_count: crate::constants::quotes::DEFAULT_FETCH_COUNT,
            request_timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub enabled: bool,

    /// Base URL of the GoTrue-compatible auth API (e.g. `https://<project>.supabase.co/auth/v1`)
    pub base_url: String,

    /// Publishable API key sent as the `apikey` header on every auth request
    pub api_key: String,

    /// Where the signed-in session (access token + profile) is persisted
    pub session_path: String,

    /// Max attempts for transient auth failures (default: 3)
    pub retry_max_attempts: u32,

    /// Fixed delay between retry attempts, in seconds (default: 2)
    pub retry_delay_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "http://localhost:9999/auth/v1".to_string(),
            api_key: "change-me".to_string(),
            session_path: "data/session.json".to_string(),
            retry_max_attempts: crate::constants::retry::MAX_AUTH_ATTEMPTS,
            retry_delay_seconds: crate::constants::retry::AUTH_BACKOFF.as_secs(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("quotarr").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".quotarr").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.quotes.base_url.is_empty() {
            anyhow::bail!("Quote API base URL cannot be empty");
        }

        url::Url::parse(&self.quotes.base_url)
            .with_context(|| format!("Invalid quote API base URL: {}", self.quotes.base_url))?;

        if self.quotes.fetch_count == 0 {
            anyhow::bail!("Quote fetch count must be > 0");
        }

        if self.auth.enabled {
            url::Url::parse(&self.auth.base_url)
                .with_context(|| format!("Invalid auth base URL: {}", self.auth.base_url))?;

            if self.auth.retry_max_attempts == 0 {
                anyhow::bail!("Auth retry attempts must be >= 1");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.quotes.fetch_count, 12);
        assert_eq!(config.general.max_db_connections, 5);
        assert_eq!(config.auth.retry_max_attempts, 3);
        assert_eq!(config.auth.retry_delay_seconds, 2);
        config.validate().unwrap();
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[quotes]"));
        assert!(toml_str.contains("[auth]"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [quotes]
            fetch_count = 20
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.quotes.fetch_count, 20);

        assert_eq!(config.auth.base_url, "http://localhost:9999/auth/v1");
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        let mut config = Config::default();
        config.quotes.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_fetch_count() {
        let mut config = Config::default();
        config.quotes.fetch_count = 0;
        assert!(config.validate().is_err());
    }
}
