//! Error types for the experiment harness.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our custom error.
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Errors that can occur while running extraction experiments.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Error reading or writing files.
    #[error("I/O error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A source image is missing from the data directory.
    #[error("Image not found at '{0}'")]
    ImageNotFound(PathBuf),

    /// Ground truth JSON for an example image is missing.
    #[error("Ground truth not found at '{0}'")]
    GroundTruthNotFound(PathBuf),

    /// The shared task prompt file is missing.
    #[error("Prompt file not found at '{0}'")]
    PromptNotFound(PathBuf),

    /// Invalid or incomplete configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error reported by the Gemini API.
    #[error("Gemini API error: {0}")]
    Api(String),

    /// HTTP transport error.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Model output or API response could not be parsed.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Error during serialization.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ExtractError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for ExtractError {
    fn from(err: reqwest::Error) -> Self {
        ExtractError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for ExtractError {
    fn from(err: serde_json::Error) -> Self {
        ExtractError::Parse(err.to_string())
    }
}
