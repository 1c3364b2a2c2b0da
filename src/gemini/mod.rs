//! Gemini API integration.

pub mod client;
pub mod types;

pub use client::{Generation, GeminiClient};
pub use types::{Content, FileData, Part, Role, UsageMetadata};
