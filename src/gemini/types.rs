//! Wire types for the Gemini generateContent and file upload APIs.

use serde::{Deserialize, Serialize};

/// Role of a conversation turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// Reference to a previously uploaded file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileData {
    pub mime_type: String,
    pub file_uri: String,
}

/// One part of a conversation turn: literal text or an uploaded file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_data: Option<FileData>,
}

impl Part {
    /// Create a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            file_data: None,
        }
    }

    /// Create a file reference part.
    pub fn file(file_data: FileData) -> Self {
        Self {
            text: None,
            file_data: Some(file_data),
        }
    }
}

/// A conversation turn: a role plus an ordered list of parts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Content {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: Role::User,
            parts,
        }
    }

    pub fn model(parts: Vec<Part>) -> Self {
        Self {
            role: Role::Model,
            parts,
        }
    }
}

/// Thinking allowance for models that support internal reasoning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ThinkingConfig {
    pub thinking_budget: u32,
}

/// Generation parameters sent with every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking_config: Option<ThinkingConfig>,
}

/// Request body for generateContent.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

/// A single candidate in a generateContent response.
#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

/// Token usage counters reported by the service.
///
/// Every field defaults to 0: the service omits counters that do not
/// apply (e.g. `thoughtsTokenCount` when thinking is disabled).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
    #[serde(default)]
    pub thoughts_token_count: u32,
    #[serde(default)]
    pub total_token_count: u32,
}

/// Response body for generateContent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub usage_metadata: UsageMetadata,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate's parts, or `None` when
    /// the response carries no text.
    pub fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let content = candidate.content.as_ref()?;

        let mut full_text = String::new();
        for part in &content.parts {
            if let Some(text) = &part.text {
                full_text.push_str(text);
            }
        }

        if full_text.is_empty() {
            None
        } else {
            Some(full_text)
        }
    }
}

/// Response body for a file upload.
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    pub file: UploadedFile,
}

/// Handle for an uploaded file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    #[serde(default)]
    pub name: String,
    pub uri: String,
    pub mime_type: String,
}

/// Gemini API error response.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(default)]
    #[allow(dead_code)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_serialization() {
        let text = Part::text("hello");
        assert_eq!(serde_json::to_string(&text).unwrap(), r#"{"text":"hello"}"#);

        let file = Part::file(FileData {
            mime_type: "image/jpeg".to_string(),
            file_uri: "https://files.example/abc".to_string(),
        });
        assert_eq!(
            serde_json::to_string(&file).unwrap(),
            r#"{"fileData":{"mimeType":"image/jpeg","fileUri":"https://files.example/abc"}}"#
        );
    }

    #[test]
    fn test_role_serialization() {
        let turn = Content::user(vec![Part::text("hi")]);
        let json = serde_json::to_string(&turn).unwrap();
        assert!(json.contains(r#""role":"user""#));

        let turn = Content::model(vec![Part::text("hi")]);
        let json = serde_json::to_string(&turn).unwrap();
        assert!(json.contains(r#""role":"model""#));
    }

    #[test]
    fn test_generation_config_omits_thinking_when_none() {
        let config = GenerationConfig {
            response_mime_type: "application/json".to_string(),
            temperature: 0.9,
            thinking_config: None,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""responseMimeType":"application/json""#));
        assert!(!json.contains("thinkingConfig"));

        let config = GenerationConfig {
            thinking_config: Some(ThinkingConfig {
                thinking_budget: 2000,
            }),
            ..config
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""thinkingConfig":{"thinkingBudget":2000}"#));
    }

    #[test]
    fn test_usage_metadata_defaults_missing_counters() {
        let usage: UsageMetadata =
            serde_json::from_str(r#"{"promptTokenCount":20,"totalTokenCount":30}"#).unwrap();
        assert_eq!(usage.prompt_token_count, 20);
        assert_eq!(usage.candidates_token_count, 0);
        assert_eq!(usage.thoughts_token_count, 0);
        assert_eq!(usage.total_token_count, 30);
    }

    #[test]
    fn test_response_text_concatenates_parts() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{
                "candidates": [
                    {"content": {"role": "model", "parts": [{"text": "{\"a\""}, {"text": ": 1}"}]}}
                ],
                "usageMetadata": {"promptTokenCount": 1, "candidatesTokenCount": 2, "totalTokenCount": 3}
            }"#,
        )
        .unwrap();
        assert_eq!(response.text().as_deref(), Some(r#"{"a": 1}"#));
    }

    #[test]
    fn test_response_text_empty_when_no_candidates() {
        let response: GenerateContentResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(response.text().is_none());
        assert_eq!(response.usage_metadata, UsageMetadata::default());
    }
}
