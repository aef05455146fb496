//! Immutable run configuration.
//!
//! Loaded once from TOML at startup and passed by reference into each
//! component at construction. Every field has a default, so an empty file
//! (or no file) yields a working configuration; validation failures are
//! fatal before any document is touched.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::event::GENERAL_EVENT_TYPE;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub processing: ProcessingConfig,
    pub extraction: ExtractionConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Context half-width in characters, applied to each side of a date match.
    pub context_window: usize,
    /// Confidence below this escalates the whole document.
    pub llm_fallback_threshold: f32,
    /// Bound on concurrent document workers.
    pub max_workers: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            context_window: 250,
            llm_fallback_threshold: 0.8,
            max_workers: 4,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Candidate event types in priority order; classification ties break
    /// to the earliest entry.
    pub event_types: Vec<String>,
    pub date_patterns: DatePatternConfig,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            event_types: [
                "Lease Agreement",
                "Court Filing",
                "Decree/Judgment",
                "Contract Execution",
                "Property Sale",
                "Compromise/Settlement",
                "Registration",
            ]
            .map(String::from)
            .to_vec(),
            date_patterns: DatePatternConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DatePatternConfig {
    /// Enables the `(Pous|Asadh) <year> B.S.` grammar.
    pub include_bengali_calendar: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Accepted file extensions, with leading dot.
    pub extensions: Vec<String>,
    pub max_file_size_mb: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            extensions: vec![".txt".into(), ".md".into()],
            max_file_size_mb: 50,
        }
    }
}

impl InputConfig {
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb * 1024 * 1024
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub sort_chronologically: bool,
    /// Formats written by the CLI: "markdown" and/or "json".
    pub formats: Vec<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            sort_chronologically: true,
            formats: vec!["markdown".into(), "json".into()],
        }
    }
}

impl Config {
    /// Load and validate configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.processing;
        if !(0.0..=1.0).contains(&p.llm_fallback_threshold) {
            return Err(ConfigError::Invalid(format!(
                "processing.llm_fallback_threshold must be in [0, 1], got {}",
                p.llm_fallback_threshold
            )));
        }
        if p.max_workers == 0 {
            return Err(ConfigError::Invalid(
                "processing.max_workers must be at least 1".into(),
            ));
        }
        if p.context_window == 0 {
            return Err(ConfigError::Invalid(
                "processing.context_window must be at least 1".into(),
            ));
        }
        if self.extraction.event_types.is_empty() {
            return Err(ConfigError::Invalid(
                "extraction.event_types must not be empty".into(),
            ));
        }
        if self
            .extraction
            .event_types
            .iter()
            .any(|t| t == GENERAL_EVENT_TYPE)
        {
            return Err(ConfigError::Invalid(format!(
                "extraction.event_types must not include the fallback type {GENERAL_EVENT_TYPE:?}"
            )));
        }
        Ok(())
    }
}
