use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::services::PasswordScheme;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Prefix for returned file URLs, e.g. `https://files.example.org`.
    /// When unset the request's own scheme and host are used.
    #[serde(default)]
    pub public_base_url: Option<String>,
    #[serde(default = "default_cors_allow_any")]
    pub cors_allow_any: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Holds the `uploads/` and `profiles/` blob areas.
    #[serde(default = "default_storage_root")]
    pub root: String,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SecurityConfig {
    #[serde(default)]
    pub password_scheme: PasswordScheme,
}

// Default values
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_cors_allow_any() -> bool {
    true
}

fn default_db_path() -> String {
    "data/medivault.db".to_string()
}

fn default_storage_root() -> String {
    "wwwroot".to_string()
}

fn default_max_upload_bytes() -> usize {
    25 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_base_url: None,
            cors_allow_any: default_cors_allow_any(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_storage_root(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl StorageConfig {
    pub fn root_path(&self) -> PathBuf {
        PathBuf::from(&self.root)
    }
}

impl Config {
    /// Load configuration from file and environment variables
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::load_from_file()?;
        config.apply_env_overrides(|key| env::var(key).ok());
        config.ensure_directories()?;
        tracing::info!(
            "Storage root: {}, password scheme: {}",
            config.storage.root,
            config.security.password_scheme.as_str()
        );
        Ok(config)
    }

    /// Load configuration from config.toml
    fn load_from_file() -> anyhow::Result<Self> {
        let config_paths = ["config.toml", "data/config.toml"];

        for path in config_paths {
            if Path::new(path).exists() {
                let content = fs::read_to_string(path)?;
                let config = Self::from_toml(&content)?;
                tracing::info!("Loaded configuration from {}", path);
                return Ok(config);
            }
        }

        tracing::info!("No configuration file found, using defaults");
        Ok(Config::default())
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply environment variable overrides
    /// Format: MV_CONF_<SECTION>_<KEY>
    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Server overrides
        if let Some(val) = var("MV_CONF_SERVER_HOST") {
            self.server.host = val;
        }
        if let Some(port) = var("MV_CONF_SERVER_PORT").and_then(|v| v.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = var("MV_CONF_SERVER_PUBLIC_BASE_URL") {
            let val = val.trim().trim_end_matches('/').to_string();
            self.server.public_base_url = if val.is_empty() { None } else { Some(val) };
        }
        if let Some(v) = var("MV_CONF_SERVER_CORS_ALLOW_ANY").and_then(|v| v.parse().ok()) {
            self.server.cors_allow_any = v;
        }

        // Database overrides
        if let Some(val) = var("MV_CONF_DATABASE_PATH") {
            self.database.path = val;
        }

        // Storage overrides
        if let Some(val) = var("MV_CONF_STORAGE_ROOT") {
            self.storage.root = val;
        }
        if let Some(bytes) = var("MV_CONF_STORAGE_MAX_UPLOAD_BYTES").and_then(|v| v.parse().ok()) {
            self.storage.max_upload_bytes = bytes;
        }

        // Security overrides
        if let Some(val) = var("MV_CONF_SECURITY_PASSWORD_SCHEME") {
            match val.parse() {
                Ok(scheme) => self.security.password_scheme = scheme,
                Err(_) => tracing::warn!("Ignoring unknown password scheme {:?}", val),
            }
        }
    }

    /// Ensure required directories exist
    fn ensure_directories(&self) -> anyhow::Result<()> {
        if let Some(parent) = Path::new(&self.database.path).parent() {
            fs::create_dir_all(parent)?;
        }
        fs::create_dir_all(&self.storage.root)?;
        Ok(())
    }
}
