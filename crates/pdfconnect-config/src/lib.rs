//! Configuration loading for PDF Knowledge Connect.
//! Reads pdfconnect.toml from the current directory or the path in PDFCONNECT_CONFIG,
//! then applies PDFCONNECT_* environment overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const CONFIG_ENV: &str = "PDFCONNECT_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "pdfconnect.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default = "default_presets")]
    pub presets: Vec<PresetCollection>,
    #[serde(default)]
    pub graph: GraphConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            server: ServerConfig::default(),
            presets: default_presets(),
            graph: GraphConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_backend_url")]
    pub url: String,
    /// No timeout unless set; a hung backend keeps the loader up.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self { url: default_backend_url(), timeout_secs: None }
    }
}

fn default_backend_url() -> String { "http://localhost:5000".to_string() }

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,
    /// Browser sessions untouched for this long are dropped with their view state.
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,
    #[serde(default = "default_max_sessions")]
    pub max_sessions: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            max_upload_mb: default_max_upload_mb(),
            session_idle_secs: default_session_idle_secs(),
            max_sessions: default_max_sessions(),
        }
    }
}

impl ServerConfig {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }

    pub fn session_idle(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }
}

fn default_host()          -> String { "127.0.0.1".to_string() }
fn default_port()          -> u16    { 3001 }
fn default_static_dir()    -> String { "static".to_string() }
fn default_max_upload_mb() -> usize  { 50 }
fn default_session_idle_secs() -> u64 { 30 * 60 }
fn default_max_sessions()  -> u64    { 10_000 }

/// A one-click collection button on the App view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetCollection {
    pub name: String,
    pub label: String,
}

fn default_presets() -> Vec<PresetCollection> {
    vec![
        PresetCollection { name: "travel_planning".to_string(),   label: "Analyze Travel Docs".to_string() },
        PresetCollection { name: "acrobat_learning".to_string(),  label: "Analyze HR Docs".to_string() },
        PresetCollection { name: "recipe_collection".to_string(), label: "Analyze Recipes".to_string() },
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphConfig {
    #[serde(default = "default_max_nodes")]
    pub max_nodes: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self { max_nodes: default_max_nodes() }
    }
}

fn default_max_nodes() -> usize { 60 }

impl Config {
    /// Load configuration.
    /// Checks PDFCONNECT_CONFIG first, then ./pdfconnect.toml. A missing
    /// file yields the defaults; an unreadable or malformed one is an error.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut config = if Path::new(&path).exists() {
            Self::load_from(&path)?
        } else {
            tracing::info!("No config file at {}, using defaults", path);
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply PDFCONNECT_BACKEND_URL, PDFCONNECT_HOST and PDFCONNECT_PORT.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("PDFCONNECT_BACKEND_URL").filter(|v| !v.is_empty()) {
            self.backend.url = url;
        }
        if let Some(host) = lookup("PDFCONNECT_HOST").filter(|v| !v.is_empty()) {
            self.server.host = host;
        }
        if let Some(port) = lookup("PDFCONNECT_PORT").filter(|v| !v.is_empty()) {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidValue { key: "PDFCONNECT_PORT", value: port })?;
        }
        Ok(())
    }

    /// Backend base URL without a trailing slash.
    pub fn backend_base_url(&self) -> &str {
        self.backend.url.trim_end_matches('/')
    }
}
