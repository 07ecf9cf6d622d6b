//! Settings read from `feedmedia.toml`.
//!
//! Transport options live at the top level. A feed request can be stored in a
//! `[request]` table, which is read straight into a [`FeedRequestConfig`].
//! Without a file every setting keeps its default.
use crate::client::ResponseFormat;
use crate::feed::FeedRequestConfig;
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::Path;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),

    /// A key parsed but holds an unusable value.
    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Feed request and transport settings.
///
/// Every key is optional. Command-line flags take precedence over the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root URL of the feed service, e.g. `https://feed.theplatform.com/f/`.
    pub base_url: Option<String>,

    /// Response format sent as the default `form` query parameter.
    pub form: ResponseFormat,

    /// Per-request timeout in seconds. Must be at least 1.
    pub timeout_secs: u64,

    /// The `[request]` table.
    pub request: Option<FeedRequestConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: None,
            form: ResponseFormat::default(),
            timeout_secs: 30,
            request: None,
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 4] = ["base_url", "form", "timeout_secs", "request"];

    /// Load configuration from a TOML file.
    ///
    /// A missing or blank file gives `Config::default()`. Unknown top-level
    /// keys are logged and ignored; a zero `timeout_secs` is rejected.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let Some(content) = read_source(path)? else {
            return Ok(Self::default());
        };

        let config = Self::parse(&content)?;
        tracing::info!(
            path = %path.display(),
            form = %config.form,
            has_request = config.request.is_some(),
            "Loaded configuration"
        );
        Ok(config)
    }

    fn parse(content: &str) -> Result<Self, ConfigError> {
        let table: toml::Table = content.parse()?;
        table
            .keys()
            .filter(|key| !Self::KNOWN_KEYS.contains(&key.as_str()))
            .for_each(|key| tracing::warn!(key = %key, "Unknown key in config file, ignoring"));

        let config: Config = toml::Value::Table(table).try_into()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timeout_secs",
                reason: "must be at least 1 second".to_string(),
            });
        }
        Ok(())
    }
}

/// Reads the config file, or `None` when it is absent or blank.
fn read_source(path: &Path) -> Result<Option<String>, ConfigError> {
    let size = match std::fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };
    if size > Config::MAX_FILE_SIZE {
        return Err(ConfigError::TooLarge(format!(
            "{} is {size} bytes (max {} bytes)",
            path.display(),
            Config::MAX_FILE_SIZE
        )));
    }

    // The file can vanish between metadata and read.
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    if content.trim().is_empty() {
        tracing::debug!(path = %path.display(), "Config file is blank, using defaults");
        return Ok(None);
    }
    Ok(Some(content))
}

// ============================================================================
// Tests
// ============================================================================
