//! Extractor configuration.
//!
//! Settings come from, in increasing priority:
//! 1. built-in defaults
//! 2. a TOML file (`--config`, or `<config_dir>/yomu/config.toml`)
//! 3. environment variables (see [`ExtractorConfig::with_env_overrides`])
//!
//! `JAVA_HOME` is deliberately not captured here: unless `java_home` is set
//! explicitly, it is read again on every extraction.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors from loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// How to invoke the Tika engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Path to the tika-app jar
    #[serde(default = "default_jar_path")]
    pub jar_path: PathBuf,
    /// Java installation root; overrides JAVA_HOME when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub java_home: Option<PathBuf>,
    /// Options passed to the JVM before `-jar`
    #[serde(default = "default_java_options")]
    pub java_options: Vec<String>,
    /// Kill the engine after this many milliseconds (unset or 0 = wait forever)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

fn default_jar_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("yomu"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tika-app.jar")
}

fn default_java_options() -> Vec<String> {
    vec!["-Djava.awt.headless=true".to_string()]
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self::base_default().with_env_overrides()
    }
}

impl ExtractorConfig {
    /// Defaults without environment overrides.
    pub fn base_default() -> Self {
        Self {
            jar_path: default_jar_path(),
            java_home: None,
            java_options: default_java_options(),
            timeout_ms: None,
        }
    }

    /// Load from a TOML file, falling back to the user config file if present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(Path::to_path_buf).or_else(|| {
            dirs::config_dir()
                .map(|d| d.join("yomu").join("config.toml"))
                .filter(|p| p.is_file())
        });

        let config = match path {
            Some(path) => {
                debug!("Loading config from {}", path.display());
                Self::from_file(&path)?
            }
            None => Self::base_default(),
        };
        Ok(config.with_env_overrides())
    }

    /// Parse a TOML file without applying environment overrides.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `YOMU_TIKA_JAR`: path to the tika-app jar
    /// - `YOMU_TIMEOUT_SECS`: engine timeout in seconds
    /// - `YOMU_JAVA_OPTS`: whitespace-separated JVM options (replaces the defaults)
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("YOMU_TIKA_JAR") {
            if !val.is_empty() {
                self.jar_path = PathBuf::from(val);
            }
        }
        if let Ok(val) = std::env::var("YOMU_TIMEOUT_SECS") {
            if let Ok(secs) = val.trim().parse::<u64>() {
                self.timeout_ms = Some(secs.saturating_mul(1000));
            }
        }
        if let Ok(val) = std::env::var("YOMU_JAVA_OPTS") {
            self.java_options = val.split_whitespace().map(str::to_string).collect();
        }
        self
    }

    pub fn with_jar_path(mut self, jar_path: impl Into<PathBuf>) -> Self {
        self.jar_path = jar_path.into();
        self
    }

    pub fn with_java_home(mut self, java_home: impl Into<PathBuf>) -> Self {
        self.java_home = Some(java_home.into());
        self
    }

    /// Set the engine timeout. Anything below a millisecond rounds up to one,
    /// so only `Duration::ZERO` disables it.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let mut millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        if millis == 0 && !timeout.is_zero() {
            millis = 1;
        }
        self.timeout_ms = Some(millis);
        self
    }

    /// Effective timeout. Zero means none.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms
            .filter(|millis| *millis > 0)
            .map(Duration::from_millis)
    }
}
