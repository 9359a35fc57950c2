//! Configuration management
//!
//! This module handles loading, validation, and management of the Focus Sort
//! configuration. Configuration is stored in TOML format at
//! ~/.focus-sort/config.toml.
//!
//! # Configuration Sections
//!
//! - **core**: Log level, data directory
//! - **server**: Bind address of the task endpoint
//! - **llm**: Chat-completion API settings
//! - **buckets**: The three bucket labels
//! - **generation**: Post-processing and list size rules
//! - **client**: Endpoint URL and timeout used by the front end
//!
//! # Environment Overrides
//!
//! The API key is never stored in the file. It is read from `GROQ_API_KEY`.
//! The model can be overridden with `VERCEL_GROQ_MODEL`, `GROQ_MODEL` or
//! `VITE_GROQ_MODEL` (first one set wins).
//!
//! # Examples
//!
//! ```no_run
//! use focus_engine::config::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load_or_create()?;
//! println!("Model: {}", config.llm.model);
//! # Ok(())
//! # }
//! ```

use focus_sdk::errors::EngineError;
use focus_sdk::BucketSet;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable holding the chat-completion API key
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

/// Environment variables that override the model, highest priority first
pub const MODEL_ENV_OVERRIDES: [&str; 3] = ["VERCEL_GROQ_MODEL", "GROQ_MODEL", "VITE_GROQ_MODEL"];

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Core settings
    pub core: CoreConfig,

    /// Task endpoint settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Chat-completion API settings
    #[serde(default)]
    pub llm: LLMConfig,

    /// Bucket labels
    #[serde(default)]
    pub buckets: BucketsConfig,

    /// Task list post-processing
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Front-end client settings
    #[serde(default)]
    pub client: ClientConfig,
}

/// Core configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Data directory path for persisted state (supports ~ expansion)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

/// HTTP endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// Chat-completion API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMConfig {
    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Maximum output tokens
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Upstream request timeout (seconds)
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,

    /// API key, resolved from the environment at load time
    #[serde(skip)]
    pub api_key: Option<String>,
}

/// Bucket label configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketsConfig {
    /// Labels in Focus, Next, Later order
    #[serde(default = "default_bucket_labels")]
    pub labels: [String; 3],
}

/// Task list post-processing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Run the dedupe / fill / interleave pass on model output
    #[serde(default = "default_true")]
    pub rebalance: bool,

    /// Replace model labels with the local keyword heuristic before rebalancing
    #[serde(default)]
    pub heuristic_override: bool,

    /// Minimum members per bucket after rebalancing (1 or 2)
    #[serde(default = "default_min_per_bucket")]
    pub min_per_bucket: usize,

    /// Smallest acceptable list
    #[serde(default = "default_min_tasks")]
    pub min_tasks: usize,

    /// Size the rebalancing pass tops up to
    #[serde(default = "default_target_tasks")]
    pub target_tasks: usize,

    /// Hard cap on list size
    #[serde(default = "default_max_tasks")]
    pub max_tasks: usize,
}

/// Front-end client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Task endpoint URL
    #[serde(default = "default_client_endpoint")]
    pub endpoint: String,

    /// Abort timeout (seconds)
    #[serde(default = "default_client_timeout")]
    pub timeout_secs: u64,
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("~/.focus-sort")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

fn default_llm_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_llm_model() -> String {
    "mixtral-8x7b-32768".to_string()
}

fn default_temperature() -> f64 {
    0.4
}

fn default_max_tokens() -> u32 {
    700
}

fn default_llm_timeout() -> u64 {
    30
}

fn default_bucket_labels() -> [String; 3] {
    BucketSet::current().labels().clone()
}

fn default_min_per_bucket() -> usize {
    2
}

fn default_min_tasks() -> usize {
    6
}

fn default_target_tasks() -> usize {
    7
}

fn default_max_tasks() -> usize {
    8
}

fn default_client_endpoint() -> String {
    format!("http://{}:{}/api/generate-tasks", default_host(), default_port())
}

fn default_client_timeout() -> u64 {
    12
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            data_dir: default_data_dir(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_llm_timeout(),
            api_key: None,
        }
    }
}

impl Default for BucketsConfig {
    fn default() -> Self {
        Self {
            labels: default_bucket_labels(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            rebalance: true,
            heuristic_override: false,
            min_per_bucket: default_min_per_bucket(),
            min_tasks: default_min_tasks(),
            target_tasks: default_target_tasks(),
            max_tasks: default_max_tasks(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: default_client_endpoint(),
            timeout_secs: default_client_timeout(),
        }
    }
}

impl BucketsConfig {
    /// Bucket set built from the configured labels
    pub fn bucket_set(&self) -> BucketSet {
        let [focus, next, later] = self.labels.clone();
        BucketSet::new(focus, next, later)
    }
}

impl Config {
    /// Load configuration from the default location (~/.focus-sort/config.toml)
    ///
    /// If the configuration file doesn't exist, creates a default configuration.
    /// Environment overrides are applied after loading.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load_or_create() -> Result<Self, EngineError> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            Self::create_default(&config_path)
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, EngineError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("Failed to read config file: {}", e)))?;

        let mut config = Self::from_toml_str(&contents)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());

        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// Does not consult the environment.
    pub fn from_toml_str(contents: &str) -> Result<Self, EngineError> {
        let mut config: Config = toml::from_str(contents)
            .map_err(|e| EngineError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate_and_process()?;

        Ok(config)
    }

    /// Create default configuration and save to path
    fn create_default(path: &Path) -> Result<Self, EngineError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                EngineError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let toml_string = toml::to_string_pretty(&Self::default())
            .map_err(|e| EngineError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, &toml_string)
            .map_err(|e| EngineError::Config(format!("Failed to write config file: {}", e)))?;

        tracing::info!("Created default configuration at {}", path.display());

        let mut config = Self::from_toml_str(&toml_string)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());

        Ok(config)
    }

    /// Get the default configuration file path (~/.focus-sort/config.toml)
    pub fn default_config_path() -> Result<PathBuf, EngineError> {
        let home = dirs::home_dir()
            .ok_or_else(|| EngineError::Config("Could not determine home directory".to_string()))?;

        Ok(home.join(".focus-sort").join("config.toml"))
    }

    /// Apply environment overrides using the given lookup
    ///
    /// Empty values are treated as unset.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        self.llm.api_key = non_empty(API_KEY_ENV);

        if let Some(model) = MODEL_ENV_OVERRIDES.iter().find_map(|key| non_empty(key)) {
            self.llm.model = model;
        }
    }

    /// Whether live generation is possible
    pub fn has_api_key(&self) -> bool {
        self.llm.api_key.is_some()
    }

    /// Validate and process configuration
    ///
    /// This method:
    /// - Validates log level, labels, sampling settings and list sizes
    /// - Expands ~ in the data directory
    fn validate_and_process(&mut self) -> Result<(), EngineError> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.core.log_level.as_str()) {
            return Err(EngineError::Config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.core.log_level,
                valid_log_levels.join(", ")
            )));
        }

        let labels = &self.buckets.labels;
        if labels.iter().any(|l| l.trim().is_empty()) {
            return Err(EngineError::Config(
                "Bucket labels must not be empty".to_string(),
            ));
        }
        if labels[0] == labels[1] || labels[1] == labels[2] || labels[0] == labels[2] {
            return Err(EngineError::Config(
                "Bucket labels must be distinct".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(EngineError::Config(
                "temperature must be between 0.0 and 2.0".to_string(),
            ));
        }
        if self.llm.max_tokens == 0 {
            return Err(EngineError::Config(
                "max_tokens must be greater than 0".to_string(),
            ));
        }

        let generation = &self.generation;
        if !(1..=2).contains(&generation.min_per_bucket) {
            return Err(EngineError::Config(
                "min_per_bucket must be 1 or 2".to_string(),
            ));
        }
        if generation.max_tasks > 8 {
            return Err(EngineError::Config(
                "max_tasks must be at most 8".to_string(),
            ));
        }
        if generation.min_tasks == 0
            || generation.min_tasks > generation.target_tasks
            || generation.target_tasks > generation.max_tasks
        {
            return Err(EngineError::Config(
                "Task counts must satisfy 0 < min_tasks <= target_tasks <= max_tasks".to_string(),
            ));
        }
        if generation.heuristic_override && !generation.rebalance {
            return Err(EngineError::Config(
                "heuristic_override requires rebalance = true".to_string(),
            ));
        }
        if generation.min_per_bucket * 3 > generation.max_tasks {
            return Err(EngineError::Config(
                "max_tasks is too small for min_per_bucket".to_string(),
            ));
        }

        if self.client.timeout_secs == 0 {
            return Err(EngineError::Config(
                "client timeout_secs must be greater than 0".to_string(),
            ));
        }

        self.core.data_dir = expand_path(&self.core.data_dir)?;

        Ok(())
    }
}

/// Expand ~ in path to user's home directory
pub fn expand_path(path: &Path) -> Result<PathBuf, EngineError> {
    let path_str = path
        .to_str()
        .ok_or_else(|| EngineError::Config("Invalid UTF-8 in path".to_string()))?;

    if let Some(rest) = path_str.strip_prefix("~/") {
        let home = dirs::home_dir()
            .ok_or_else(|| EngineError::Config("Could not determine home directory".to_string()))?;

        Ok(home.join(rest))
    } else if path_str == "~" {
        dirs::home_dir()
            .ok_or_else(|| EngineError::Config("Could not determine home directory".to_string()))
    } else {
        Ok(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_config_creation() {
        let config = Config::default();

        assert_eq!(config.core.log_level, "info");
        assert_eq!(config.llm.model, "mixtral-8x7b-32768");
        assert_eq!(config.llm.temperature, 0.4);
        assert_eq!(config.llm.max_tokens, 700);
        assert_eq!(config.client.timeout_secs, 12);
        assert_eq!(config.generation.max_tasks, 8);
        assert!(config.llm.api_key.is_none());
    }

    #[test]
    fn test_minimal_toml() {
        let config = Config::from_toml_str("[core]\nlog_level = \"debug\"\ndata_dir = \"/tmp/fs\"\n")
            .unwrap();
        assert_eq!(config.core.log_level, "debug");
        assert_eq!(config.buckets.bucket_set(), BucketSet::current());
        assert_eq!(config.core.data_dir, PathBuf::from("/tmp/fs"));
    }

    #[test]
    fn test_rejects_duplicate_labels() {
        let toml = r#"
[core]
[buckets]
labels = ["Now", "Now", "Never"]
"#;
        let err = Config::from_toml_str(toml).unwrap_err();
        assert!(err.to_string().contains("distinct"));
    }

    #[test]
    fn test_rejects_bad_counts() {
        let toml = r#"
[core]
[generation]
min_tasks = 7
target_tasks = 6
"#;
        assert!(Config::from_toml_str(toml).is_err());
    }

    #[test]
    fn test_rejects_heuristic_without_rebalance() {
        let toml = r#"
[core]
[generation]
rebalance = false
heuristic_override = true
"#;
        let err = Config::from_toml_str(toml).unwrap_err();
        assert!(err.to_string().contains("heuristic_override"));
    }

    #[test]
    fn test_env_overrides_precedence() {
        let vars = env(&[
            ("GROQ_API_KEY", "gsk_test"),
            ("GROQ_MODEL", "llama-3.1-8b-instant"),
            ("VITE_GROQ_MODEL", "ignored"),
        ]);
        let mut config = Config::default();
        config.apply_env_overrides(|k| vars.get(k).cloned());

        assert_eq!(config.llm.api_key.as_deref(), Some("gsk_test"));
        assert_eq!(config.llm.model, "llama-3.1-8b-instant");
        assert!(config.has_api_key());
    }

    #[test]
    fn test_empty_api_key_is_unset() {
        let vars = env(&[("GROQ_API_KEY", "  ")]);
        let mut config = Config::default();
        config.apply_env_overrides(|k| vars.get(k).cloned());
        assert!(!config.has_api_key());
        assert_eq!(config.llm.model, "mixtral-8x7b-32768");
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let path = PathBuf::from("~/test");
        let expanded = expand_path(&path).unwrap();

        let home = dirs::home_dir().unwrap();
        assert_eq!(expanded, home.join("test"));
    }

    #[test]
    fn test_config_serialization_skips_key() {
        let mut config = Config::default();
        config.llm.api_key = Some("secret".to_string());
        let toml_string = toml::to_string(&config).unwrap();
        assert!(!toml_string.contains("secret"));

        let deserialized: Config = toml::from_str(&toml_string).unwrap();
        assert_eq!(config.llm.model, deserialized.llm.model);
        assert!(deserialized.llm.api_key.is_none());
    }
}
