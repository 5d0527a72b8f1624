//! Application configuration module
//!
//! Manages application configuration loaded from config.json.
//! Creates default config file on first run.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Remote backend (row API, auth, object storage)
    #[serde(default)]
    pub backend: BackendConfig,
    /// Local persistent store
    #[serde(default)]
    pub storage: StorageConfig,
    /// Search tuning
    #[serde(default)]
    pub search: SearchConfig,
    /// School contact details shown on the content pages
    #[serde(default)]
    pub school: SchoolConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
}

/// Backend-as-a-service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Project base URL. Empty means the in-memory gateway is used.
    pub url: String,
    /// Public anon key sent as `apikey`
    pub anon_key: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Local store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory path
    pub data_dir: String,
    /// Key-value file name (relative to data_dir)
    pub local_store_file: String,
}

/// Search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke, in milliseconds
    pub debounce_ms: u64,
    /// Maximum number of remembered queries
    pub history_limit: usize,
    /// Maximum number of announcement hits per search
    pub announcement_limit: usize,
}

/// School contact details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolConfig {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub hours: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8190,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            timeout_secs: 15,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            local_store_file: "local_store.json".to_string(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            history_limit: 5,
            announcement_limit: 5,
        }
    }
}

impl Default for SchoolConfig {
    fn default() -> Self {
        Self {
            name: "Ref Akademi".to_string(),
            address: "Bağdat Caddesi No: 120, Kadıköy / İstanbul".to_string(),
            phone: "+90 216 555 01 20".to_string(),
            email: "info@refakademi.com".to_string(),
            hours: "08:00 - 18:00".to_string(),
        }
    }
}

impl AppConfig {
    /// Get the full data directory path
    pub fn get_data_dir(&self) -> PathBuf {
        PathBuf::from(&self.storage.data_dir)
    }

    /// Get the local key-value store path
    pub fn get_local_store_path(&self) -> PathBuf {
        self.get_data_dir().join(&self.storage.local_store_file)
    }

    /// Get the server bind address
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.search.debounce_ms)
    }

    /// Apply environment overrides for the backend credentials
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("REFACADEMY_BACKEND_URL") {
            self.backend.url = url;
        }
        if let Ok(key) = std::env::var("REFACADEMY_ANON_KEY") {
            self.backend.anon_key = key;
        }
    }
}

/// Get the config file path
fn get_config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("config.json")
}

/// Load configuration from ./config.json, or create default if not exists
pub fn load_config() -> Result<AppConfig, String> {
    load_config_from(&get_config_path())
}

/// Load configuration from a specific file, creating it with defaults if missing
pub fn load_config_from(config_path: &Path) -> Result<AppConfig, String> {
    if config_path.exists() {
        let content = std::fs::read_to_string(config_path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config file: {}", e))?;

        tracing::info!("Loaded configuration from {:?}", config_path);
        Ok(config)
    } else {
        let config = AppConfig::default();
        save_config_to(&config, config_path)?;
        tracing::info!("Created default configuration at {:?}", config_path);
        Ok(config)
    }
}

/// Save configuration to file
pub fn save_config_to(config: &AppConfig, config_path: &Path) -> Result<(), String> {
    let content = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;

    std::fs::write(config_path, content)
        .map_err(|e| format!("Failed to write config file: {}", e))?;

    Ok(())
}
