use crate::defaults;
use crate::error::{Result, TranscribeError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub recognizer: RecognizerConfig,
    pub audio: AudioConfig,
}

/// Remote speech recognition configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecognizerConfig {
    pub endpoint: String,
    pub api_key: String,
    pub language: String,
    pub profanity_filter: bool,
}

/// Audio preparation configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct AudioConfig {
    /// Directory for transcoded temp files. System temp dir when unset.
    pub temp_dir: Option<PathBuf>,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::RECOGNIZER_ENDPOINT.to_string(),
            api_key: defaults::RECOGNIZER_API_KEY.to_string(),
            language: defaults::DEFAULT_LANGUAGE.to_string(),
            profanity_filter: false,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Missing fields use default values. A missing file is reported as
    /// [`TranscribeError::Io`] so callers can tell it apart from bad TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| TranscribeError::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load configuration from a file or return defaults if the file doesn't exist
    ///
    /// Invalid TOML and unreadable files are still errors.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(TranscribeError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - TRANSCRIBE_LANGUAGE → recognizer.language
    /// - TRANSCRIBE_API_KEY → recognizer.api_key
    /// - TRANSCRIBE_ENDPOINT → recognizer.endpoint
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(language) = std::env::var("TRANSCRIBE_LANGUAGE")
            && !language.is_empty()
        {
            self.recognizer.language = language;
        }

        if let Ok(key) = std::env::var("TRANSCRIBE_API_KEY")
            && !key.is_empty()
        {
            self.recognizer.api_key = key;
        }

        if let Ok(endpoint) = std::env::var("TRANSCRIBE_ENDPOINT")
            && !endpoint.is_empty()
        {
            self.recognizer.endpoint = endpoint;
        }

        self
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/transcribe/config.toml on Linux
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("transcribe").join("config.toml"))
            .ok_or(TranscribeError::ConfigDirUnavailable)
    }
}
