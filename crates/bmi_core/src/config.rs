//! Configuration for the BMI predictor

use crate::errors::{BmiError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the model path
pub const ENV_MODEL_PATH: &str = "BMI_MODEL_PATH";
/// Environment variable overriding the expected model digest
pub const ENV_MODEL_BLAKE3: &str = "BMI_MODEL_BLAKE3";
/// Environment variable overriding the log level
pub const ENV_LOG_LEVEL: &str = "BMI_LOG_LEVEL";
/// Environment variable overriding the log format
pub const ENV_LOG_FORMAT: &str = "BMI_LOG_FORMAT";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BmiConfig {
    /// Bundled model settings
    pub model: ModelConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

/// Bundled model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path of the model artifact
    pub path: PathBuf,
    /// Expected BLAKE3 digest of the artifact (hex); unchecked when absent
    pub expected_blake3: Option<String>,
    /// Largest artifact accepted, in bytes
    pub max_size_bytes: u64,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
}

impl std::str::FromStr for LogFormat {
    type Err = BmiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(BmiError::Config(format!("unknown log format {:?}", other))),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("bodexmodel.tflite"),
            expected_blake3: None,
            max_size_bytes: 64 * 1024 * 1024, // 64 MiB
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

impl BmiConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|e| {
            BmiError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let mut config: BmiConfig = toml::from_str(&content)
            .map_err(|e| BmiError::Config(format!("Failed to parse config: {}", e)))?;

        // Relative model paths resolve against the config file's directory.
        if config.model.path.is_relative() {
            if let Some(dir) = path.parent() {
                config.model.path = dir.join(&config.model.path);
            }
        }

        Ok(config)
    }

    /// Load from `path` when given, otherwise start from defaults, then
    /// apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `BMI_*` overrides read through `lookup`
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup(ENV_MODEL_PATH) {
            self.model.path = PathBuf::from(val);
        }

        if let Some(val) = lookup(ENV_MODEL_BLAKE3) {
            let val = val.trim().to_string();
            self.model.expected_blake3 = if val.is_empty() { None } else { Some(val) };
        }

        if let Some(val) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = val;
        }

        if let Some(val) = lookup(ENV_LOG_FORMAT) {
            self.logging.format = val.parse()?;
        }

        Ok(())
    }

    /// Check for settings that cannot work
    pub fn validate(&self) -> Result<Vec<String>> {
        let mut warnings = Vec::new();

        if self.model.max_size_bytes == 0 {
            return Err(BmiError::Config(
                "model.max_size_bytes must be greater than 0".to_string(),
            ));
        }

        if let Some(digest) = &self.model.expected_blake3 {
            let valid = digest.len() == 64 && digest.chars().all(|c| c.is_ascii_hexdigit());
            if !valid {
                return Err(BmiError::Config(format!(
                    "model.expected_blake3 must be 64 hex characters, got {:?}",
                    digest
                )));
            }
        } else {
            warnings.push("No expected model digest configured, integrity check disabled".to_string());
        }

        if self.logging.level.trim().is_empty() {
            warnings.push("Empty log level, falling back to \"info\"".to_string());
        }

        for warning in &warnings {
            warn!("{}", warning);
        }

        Ok(warnings)
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| BmiError::Config(format!("Failed to serialize config: {}", e)))
    }
}
