//! Configuration for the experiment harness.
//!
//! Supports both environment variables and YAML config file.
//! Environment variables take precedence over config file values.

use crate::error::{ExtractError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Default Gemini API endpoint.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Gemini API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Base URL for the Gemini API.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// API key for authentication.
    pub api_key: String,

    /// Sampling temperature. High on purpose: repeated runs of the same
    /// experiment identity should produce diverse outputs.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Fixed delay between generation calls, in seconds. 0 disables it.
    #[serde(default)]
    pub request_delay_secs: u64,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_temperature() -> f32 {
    0.9
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_key: String::new(),
            temperature: default_temperature(),
            request_delay_secs: 0,
        }
    }
}

/// Full application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Gemini settings.
    pub gemini: GeminiConfig,
}

/// Configuration file structure (YAML format).
#[derive(Debug, Deserialize)]
struct ConfigFile {
    gemini: Option<GeminiFileSection>,
}

#[derive(Debug, Deserialize)]
struct GeminiFileSection {
    api_base: Option<String>,
    api_key: Option<String>,
    temperature: Option<f32>,
    request_delay_secs: Option<u64>,
}

impl Config {
    /// Load configuration from environment variables and optional config file.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (GEMINI_API_KEY, GEMINI_API_BASE, ...)
    /// 2. Config file (~/.config/vlm-experiments/config.yaml)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        let mut config = Config::default();

        // Try to load from config file first
        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                config = Self::load_from_file(&config_path)?;
            }
        }

        // Override with environment variables
        if let Ok(api_key) = env::var("GEMINI_API_KEY") {
            config.gemini.api_key = api_key;
        }

        if let Ok(api_base) = env::var("GEMINI_API_BASE") {
            config.gemini.api_base = api_base;
        }

        if let Ok(temperature) = env::var("GEMINI_TEMPERATURE") {
            if let Ok(temp) = temperature.parse() {
                config.gemini.temperature = temp;
            }
        }

        if let Ok(delay) = env::var("GEMINI_REQUEST_DELAY_SECS") {
            if let Ok(secs) = delay.parse() {
                config.gemini.request_delay_secs = secs;
            }
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ExtractError::io(path, e))?;

        let file_config: ConfigFile = serde_yaml::from_str(&content)
            .map_err(|e| ExtractError::Config(format!("Failed to parse config file: {}", e)))?;

        let mut config = Config::default();

        if let Some(gemini) = file_config.gemini {
            if let Some(api_base) = gemini.api_base {
                config.gemini.api_base = api_base;
            }
            if let Some(api_key) = gemini.api_key {
                config.gemini.api_key = api_key;
            }
            if let Some(temperature) = gemini.temperature {
                config.gemini.temperature = temperature;
            }
            if let Some(delay) = gemini.request_delay_secs {
                config.gemini.request_delay_secs = delay;
            }
        }

        Ok(config)
    }

    /// Get the default config file path.
    pub fn config_file_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "vlm-experiments")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Validate that required configuration is present.
    ///
    /// A missing API key is a fatal startup condition: experiments never
    /// start without a credential.
    pub fn validate(&self) -> Result<()> {
        if self.gemini.api_key.is_empty() {
            return Err(ExtractError::Config(
                "Gemini API key is required. Set GEMINI_API_KEY environment variable or add to config file.".to_string()
            ));
        }

        if self.gemini.api_base.is_empty() {
            return Err(ExtractError::Config(
                "Gemini API base URL is required. Set GEMINI_API_BASE environment variable or add to config file.".to_string()
            ));
        }

        Ok(())
    }

    /// Create a config from explicit values (useful for testing).
    pub fn with_gemini(api_base: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            gemini: GeminiConfig {
                api_base: api_base.into(),
                api_key: api_key.into(),
                ..Default::default()
            },
        }
    }
}
