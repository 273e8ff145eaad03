//! Configuration module for the small file server.
//!
//! Loads configuration from YAML files and environment variables.

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

use crate::logging::DEFAULT_FILTER;
use crate::storage::{ConfiguredSmallFile, RegistryLimits};

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub cluster: ClusterConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Cluster membership configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClusterConfig {
    /// Shared token cluster nodes present. Generated at startup when unset.
    #[serde(default)]
    pub token: Option<String>,
}

/// Small file registry configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    /// Largest file body accepted, in bytes.
    #[serde(default = "default_max_file_size_bytes")]
    pub max_file_size_bytes: u64,
    /// Maximum number of registered files.
    #[serde(default = "default_max_file_count")]
    pub max_file_count: usize,
    /// Files registered at startup.
    #[serde(default)]
    pub files: Vec<ConfiguredSmallFile>,
}

fn default_max_file_size_bytes() -> u64 {
    RegistryLimits::default().max_file_size_bytes
}

fn default_max_file_count() -> usize {
    RegistryLimits::default().max_file_count
}

impl RegistryConfig {
    pub fn limits(&self) -> RegistryLimits {
        RegistryLimits {
            max_file_size_bytes: self.max_file_size_bytes,
            max_file_count: self.max_file_count,
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        let limits = RegistryLimits::default();
        Self {
            max_file_size_bytes: limits.max_file_size_bytes,
            max_file_count: limits.max_file_count,
            files: Vec::new(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line, with file and line numbers.
    #[default]
    Json,
    /// Human-readable lines for local runs.
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    /// `EnvFilter` directives, overridden by `RUST_LOG`.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    DEFAULT_FILTER.to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            filter: default_log_filter(),
        }
    }
}

impl Config {
    /// Load configuration from files and environment.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (SMALLFILE_*)
    /// 2. config/local.yaml (if exists)
    /// 3. config/default.yaml
    pub fn load() -> Result<Self, ConfigError> {
        let config = ConfigLoader::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8030)?
            // Start with default config
            .add_source(File::with_name("config/default").required(false))
            // Layer on local overrides
            .add_source(File::with_name("config/local").required(false))
            // Layer on environment variables with SMALLFILE_ prefix
            .add_source(
                Environment::with_prefix("SMALLFILE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
