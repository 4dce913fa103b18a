//! Configuration management for the Gavel service.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.

use crate::core::error::{GavelError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub tasks: TasksConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Object store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Store backend: "fs" or "memory"
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Root directory for the filesystem backend
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,

    /// Container holding source meeting documents
    #[serde(default = "default_source_container")]
    pub source_container: String,

    /// Container holding derived index artifacts
    #[serde(default = "default_index_container")]
    pub index_container: String,

    /// Container holding place/department metadata blobs
    #[serde(default = "default_meta_container")]
    pub meta_container: String,

    /// Container holding extracted upload text
    #[serde(default = "default_upload_container")]
    pub upload_container: String,
}

/// Summarization endpoint configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    /// Base URL of the OpenAI-compatible completion API
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    /// Model (or deployment) name
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Max completion tokens per summarization request
    #[serde(default = "default_llm_max_tokens")]
    pub max_tokens: u32,
}

/// Request/response cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Default TTL applied when a cache write omits one
    #[serde(default = "default_cache_ttl")]
    pub default_ttl_secs: u64,
}

/// Background task registry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TasksConfig {
    /// Maximum retained task records; oldest are evicted beyond this
    #[serde(default = "default_tasks_max_entries")]
    pub max_entries: usize,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_backend() -> String {
    "fs".to_string()
}

fn default_root_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_source_container() -> String {
    "minutes".to_string()
}

fn default_index_container() -> String {
    "minutes-index".to_string()
}

fn default_meta_container() -> String {
    "minutes-meta".to_string()
}

fn default_upload_container() -> String {
    "minutes-uploads".to_string()
}

fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_llm_max_tokens() -> u32 {
    10_000
}

fn default_cache_ttl() -> u64 {
    60
}

fn default_tasks_max_entries() -> usize {
    1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            root_dir: default_root_dir(),
            source_container: default_source_container(),
            index_container: default_index_container(),
            meta_container: default_meta_container(),
            upload_container: default_upload_container(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            max_tokens: default_llm_max_tokens(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_secs: default_cache_ttl(),
        }
    }
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            max_entries: default_tasks_max_entries(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| GavelError::Config(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    ///
    /// Priority order:
    /// 1. GAVEL_CONFIG env var pointing at a TOML file
    /// 2. ./gavel.toml
    /// 3. Defaults
    pub fn load() -> Result<Self> {
        let mut config = if let Ok(config_path) = env::var("GAVEL_CONFIG") {
            Self::from_file(config_path)?
        } else if Path::new("gavel.toml").exists() {
            Self::from_file("gavel.toml")?
        } else {
            Self::default()
        };

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        if let Ok(host) = env::var("GAVEL_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("GAVEL_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Ok(data_dir) = env::var("GAVEL_DATA_DIR") {
            self.storage.root_dir = PathBuf::from(data_dir);
        }
        if let Ok(base_url) = env::var("GAVEL_LLM_BASE_URL") {
            self.llm.base_url = base_url;
        }
        if let Ok(model) = env::var("GAVEL_LLM_MODEL") {
            self.llm.model = model;
        }
        if let Ok(ttl) = env::var("GAVEL_CACHE_TTL_SECS") {
            if let Ok(t) = ttl.parse() {
                self.cache.default_ttl_secs = t;
            }
        }
        if let Ok(max) = env::var("GAVEL_TASKS_MAX_ENTRIES") {
            if let Ok(m) = max.parse() {
                self.tasks.max_entries = m;
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.storage.backend != "fs" && self.storage.backend != "memory" {
            return Err(GavelError::Config(format!(
                "Unknown storage backend: {}",
                self.storage.backend
            )));
        }

        for (name, value) in [
            ("source_container", &self.storage.source_container),
            ("index_container", &self.storage.index_container),
            ("meta_container", &self.storage.meta_container),
            ("upload_container", &self.storage.upload_container),
        ] {
            if value.is_empty() {
                return Err(GavelError::Config(format!("{name} must be non-empty")));
            }
        }

        if self.llm.max_tokens == 0 {
            return Err(GavelError::Config(
                "LLM max tokens must be non-zero".to_string(),
            ));
        }

        if self.cache.default_ttl_secs == 0 {
            return Err(GavelError::Config(
                "Cache default TTL must be non-zero".to_string(),
            ));
        }

        if self.tasks.max_entries == 0 {
            return Err(GavelError::Config(
                "Task registry max entries must be non-zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Log configuration (redacting sensitive values)
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Bind: {}:{}", self.server.host, self.server.port);
        tracing::info!("  Storage backend: {}", self.storage.backend);
        tracing::info!("  Storage root: {:?}", self.storage.root_dir);
        tracing::info!(
            "  Containers: source={} index={} meta={} uploads={}",
            self.storage.source_container,
            self.storage.index_container,
            self.storage.meta_container,
            self.storage.upload_container
        );
        tracing::info!("  LLM endpoint: {}", self.llm.base_url);
        tracing::info!("  LLM model: {}", self.llm.model);
        tracing::info!("  LLM max tokens: {}", self.llm.max_tokens);
        tracing::info!("  Cache default TTL: {}s", self.cache.default_ttl_secs);
        tracing::info!("  Task registry cap: {}", self.tasks.max_entries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.backend, "fs");
        assert_eq!(config.storage.source_container, "minutes");
        assert_eq!(config.cache.default_ttl_secs, 60);
        assert_eq!(config.tasks.max_entries, 1024);
    }

    #[test]
    fn test_config_validation_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_unknown_backend() {
        let mut config = Config::default();
        config.storage.backend = "s3".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_empty_container() {
        let mut config = Config::default();
        config.storage.index_container = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_ttl() {
        let mut config = Config::default();
        config.cache.default_ttl_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_task_cap() {
        let mut config = Config::default();
        config.tasks.max_entries = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_deserialization() {
        let toml = r#"
            [server]
            host = "127.0.0.1"
            port = 9090

            [storage]
            backend = "memory"
            root_dir = "/data/gavel"
            source_container = "docs"

            [llm]
            base_url = "http://localhost:11434/v1"
            model = "llama3"
            max_tokens = 4096

            [cache]
            default_ttl_secs = 120

            [tasks]
            max_entries = 16
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.storage.backend, "memory");
        assert_eq!(config.storage.source_container, "docs");
        // Unset fields fall back to defaults
        assert_eq!(config.storage.index_container, "minutes-index");
        assert_eq!(config.llm.max_tokens, 4096);
        assert_eq!(config.cache.default_ttl_secs, 120);
        assert_eq!(config.tasks.max_entries, 16);
    }

    #[test]
    fn test_env_var_override() {
        env::set_var("GAVEL_CACHE_TTL_SECS", "300");

        let mut config = Config::default();
        config.merge_env();

        assert_eq!(config.cache.default_ttl_secs, 300);

        env::remove_var("GAVEL_CACHE_TTL_SECS");
    }
}
