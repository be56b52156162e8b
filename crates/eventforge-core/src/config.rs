//! Configuration loading and typed config structures for the synthesis
//! engine.
//!
//! The canonical configuration lives in `eventforge-config.yaml` at the
//! project root. Every field is defaulted, so an empty file (or no file)
//! yields the standard `JavaBeans` naming rules with info-level logging.

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::naming::{BeanNaming, NamingConvention, VerbatimNaming};

/// Environment variable overriding `logging.level`.
pub const LOG_LEVEL_ENV: &str = "EVENTFORGE_LOG";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level engine configuration.
///
/// Mirrors the structure of `eventforge-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SynthesisConfig {
    /// Accessor -> property name derivation.
    #[serde(default)]
    pub naming: NamingConfig,

    /// Property binding behaviour.
    #[serde(default)]
    pub binding: BindingConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SynthesisConfig {
    /// Load configuration from a YAML file.
    ///
    /// `EVENTFORGE_LOG`, when set, overrides `logging.level`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to an empty mapping.
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.logging.apply_env_overrides();
        Ok(config)
    }
}

/// Which naming convention to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingStyle {
    /// Strip `get`/`is` and decapitalize.
    #[default]
    Bean,
    /// Use method names unchanged.
    Verbatim,
}

/// Naming settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NamingConfig {
    /// The convention.
    #[serde(default)]
    pub style: NamingStyle,

    /// Only strip `is` from boolean accessors (bean style only).
    #[serde(default = "default_true")]
    pub strict_is_prefix: bool,
}

impl NamingConfig {
    /// Build the configured convention.
    pub fn convention(&self) -> Arc<dyn NamingConvention> {
        match self.style {
            NamingStyle::Bean => Arc::new(BeanNaming {
                strict_is_prefix: self.strict_is_prefix,
            }),
            NamingStyle::Verbatim => Arc::new(VerbatimNaming),
        }
    }
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            style: NamingStyle::default(),
            strict_is_prefix: default_true(),
        }
    }
}

/// Binding settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BindingConfig {
    /// Log property-bag keys the target interface does not declare (at
    /// `trace` level).
    #[serde(default = "default_true")]
    pub trace_ignored_properties: bool,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            trace_ignored_properties: default_true(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default `tracing` filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl LoggingConfig {
    /// Override the level with `EVENTFORGE_LOG` when set.
    pub fn apply_env_overrides(&mut self) {
        self.override_level(std::env::var(LOG_LEVEL_ENV).ok());
    }

    /// Replace the level with a non-blank override.
    fn override_level(&mut self, level: Option<String>) {
        if let Some(level) = level.filter(|l| !l.trim().is_empty()) {
            self.level = level;
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

const fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_owned()
}
