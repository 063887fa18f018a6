//! Configuration management for casebrief using the prefer crate.
//!
//! Precedence, lowest first: built-in defaults, config file, environment,
//! command-line flags.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::llm::LlmConfig;
use crate::server::DEFAULT_ENDPOINT_PATH;

/// Default bind address for `casebrief serve`.
pub const DEFAULT_BIND: &str = "127.0.0.1:3030";

/// Analysis server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to listen on (PORT, HOST or HOST:PORT)
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Path of the analysis endpoint
    #[serde(default = "default_endpoint_path")]
    pub endpoint_path: String,
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_endpoint_path() -> String {
    DEFAULT_ENDPOINT_PATH.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            endpoint_path: default_endpoint_path(),
        }
    }
}

/// Settings for the front end's analysis requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Full URL of the analysis endpoint
    #[serde(default = "default_client_endpoint")]
    pub endpoint: String,
    /// Sent as `apikey` and bearer token when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_client_timeout")]
    pub timeout_secs: u64,
    /// Shortest time the progress view is shown, in milliseconds
    #[serde(default)]
    pub min_loading_ms: u64,
}

fn default_client_endpoint() -> String {
    format!("http://{}{}", DEFAULT_BIND, DEFAULT_ENDPOINT_PATH)
}

fn default_client_timeout() -> u64 {
    120
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: default_client_endpoint(),
            api_key: None,
            timeout_secs: default_client_timeout(),
            min_loading_ms: 0,
        }
    }
}

impl ClientConfig {
    /// Apply `CASEBRIEF_ENDPOINT` and `CASEBRIEF_API_KEY`.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    pub fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(endpoint) = var("CASEBRIEF_ENDPOINT").filter(|s| !s.is_empty()) {
            tracing::debug!("Using CASEBRIEF_ENDPOINT from environment: {}", endpoint);
            self.endpoint = endpoint;
        }
        if let Some(key) = var("CASEBRIEF_API_KEY").filter(|s| !s.is_empty()) {
            self.api_key = Some(key);
        }
        self
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub client: ClientConfig,
    /// Completion provider used by the server.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer crate for discovery.
    /// Automatically discovers casebrief config files in standard locations.
    pub async fn load() -> Self {
        match prefer::load("casebrief").await {
            Ok(pref_config) => {
                if let Some(path) = pref_config.source_path() {
                    match Self::load_from_path(path).await {
                        Ok(config) => config,
                        Err(e) => {
                            tracing::warn!("{}", e);
                            Self::default_with_env()
                        }
                    }
                } else {
                    Self::default_with_env()
                }
            }
            Err(_) => Self::default_with_env(),
        }
    }

    /// Defaults with environment variable overrides applied.
    pub fn default_with_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Load configuration from a specific file path.
    /// Supports JSON, TOML and YAML based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, String> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

        let mut config: Config = match ext {
            "toml" => toml::from_str(&contents)
                .map_err(|e| format!("Failed to parse TOML config: {}", e))?,
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .map_err(|e| format!("Failed to parse YAML config: {}", e))?,
            _ => serde_json::from_str(&contents)
                .map_err(|e| format!("Failed to parse JSON config: {}", e))?,
        };

        config.source_path = Some(path.to_path_buf());
        Ok(config.with_env_overrides())
    }

    /// Environment variables take precedence over file values.
    pub fn with_env_overrides(mut self) -> Self {
        self.client = self.client.with_env_overrides();
        self.llm = self.llm.with_env_overrides();
        self
    }

    /// Serialize as pretty JSON for display.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Options for loading configuration.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides auto-discovery).
    pub config_path: Option<PathBuf>,
}

/// Load configuration with explicit options.
///
/// An explicit path that cannot be read or parsed is an error; a missing
/// auto-discovered file falls back to defaults.
pub async fn load_config(options: LoadOptions) -> anyhow::Result<Config> {
    if let Some(ref config_path) = options.config_path {
        let config = Config::load_from_path(config_path)
            .await
            .map_err(|e| anyhow::anyhow!("{}: {}", config_path.display(), e))?;
        tracing::debug!("Loaded config from {}", config_path.display());
        return Ok(config);
    }

    Ok(Config::load().await)
}
