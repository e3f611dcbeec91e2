//! Configuration file handling for snapsight.
//!
//! Loads configuration from `<config dir>/snapsight/config.toml` or a custom path.
//! Every field is optional; anything left out falls back to the built-in default.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::analysis::{DEFAULT_BASE_URL, DEFAULT_MIME_TYPE, DEFAULT_MODEL, DEFAULT_PROMPT};

/// Default connect timeout for the inference endpoint.
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub image: ImageConfig,
    pub capture: CaptureConfig,
}

/// Inference endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL; `/chat/completions` is appended
    pub base_url: String,
    pub model: String,
    pub prompt: String,
    pub connect_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

/// How images are labelled in the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// MIME type put in the `data:` URI
    pub mime_type: String,
    /// Label by file extension instead of `mime_type`
    pub detect_mime_type: bool,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            mime_type: DEFAULT_MIME_TYPE.to_string(),
            detect_mime_type: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Camera index or name substring (None = first camera)
    pub device: Option<String>,
}

impl Config {
    /// Load configuration from a file path.
    ///
    /// With no explicit path, a missing default file yields the default config.
    /// An explicit path must exist. A file that exists but cannot be parsed is
    /// always an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let explicit = path.is_some();
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if !path.exists() {
            if explicit {
                return Err(ConfigError::NotFound { path });
            }
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;
        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.clone(),
            source: e,
        })?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Write the default configuration to `path`, creating parent directories.
    ///
    /// Refuses to overwrite an existing file.
    pub fn write_default(path: &Path) -> Result<(), ConfigError> {
        if path.exists() {
            return Err(ConfigError::AlreadyExists {
                path: path.to_path_buf(),
            });
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let content = Config::default().to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file '{}' not found", .path.display())]
    NotFound { path: PathBuf },

    #[error("Config file '{}' already exists", .path.display())]
    AlreadyExists { path: PathBuf },

    #[error("Failed to read config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("snapsight").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/snapsight/config.toml")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_values() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "https://api.groq.com/openai/v1");
        assert_eq!(config.api.model, "llama-3.2-11b-vision-preview");
        assert_eq!(config.api.prompt, "What is there in the image?");
        assert_eq!(config.image.mime_type, "image/jpeg");
        assert!(!config.image.detect_mime_type);
        assert!(config.capture.device.is_none());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[api]\nmodel = \"other-vision-model\"\n\n[capture]\ndevice = \"1\"").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.api.model, "other-vision-model");
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.capture.device.as_deref(), Some("1"));
        assert_eq!(config.image, ImageConfig::default());
    }

    #[test]
    fn test_explicit_missing_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let result = Config::load(Some(&missing));
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[api\nmodel = ").unwrap();

        let result = Config::load(Some(file.path()));
        match result {
            Err(ConfigError::Parse { path, .. }) => assert_eq!(path, file.path()),
            other => panic!("Expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_write_default_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        Config::write_default(&path).unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config, Config::default());

        let again = Config::write_default(&path);
        assert!(matches!(again, Err(ConfigError::AlreadyExists { .. })));
    }

    #[test]
    fn test_default_path_ends_with_config_toml() {
        let path = default_path();
        assert!(path.ends_with("snapsight/config.toml"));
    }
}
