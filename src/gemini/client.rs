//! Gemini API client.
//!
//! Covers the two operations the harness needs: raw media upload
//! (reusable file handles for image turns) and generateContent with a
//! JSON response type and an optional thinking budget.

use crate::config::GeminiConfig;
use crate::error::{ExtractError, Result};
use crate::gemini::types::{
    ApiErrorBody, Content, FileData, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig, Part, ThinkingConfig, UploadResponse, UsageMetadata,
};
use reqwest::Client;
use std::path::Path;

const JPEG_MIME: &str = "image/jpeg";

/// Result of a generateContent call.
#[derive(Debug)]
pub struct Generation {
    /// Candidate text, `None` when the service returned no text.
    pub text: Option<String>,
    /// Token usage counters for this call.
    pub usage: UsageMetadata,
}

/// Client for the Gemini REST API.
#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    /// URL for generateContent. `model` carries its `models/` prefix.
    fn generate_endpoint(&self, model: &str) -> String {
        let base = self.config.api_base.trim_end_matches('/');
        format!("{}/v1beta/{}:generateContent", base, model)
    }

    /// URL for raw media upload.
    fn upload_endpoint(&self) -> String {
        let base = self.config.api_base.trim_end_matches('/');
        format!("{}/upload/v1beta/files", base)
    }

    /// Upload a JPEG image and return a reusable file handle.
    pub async fn upload_image(&self, path: &Path) -> Result<FileData> {
        let bytes = std::fs::read(path).map_err(|e| ExtractError::io(path, e))?;

        let response = self
            .http
            .post(self.upload_endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .header("X-Goog-Upload-Protocol", "raw")
            .header("Content-Type", JPEG_MIME)
            .body(bytes)
            .send()
            .await?;

        let body = Self::check_status(response).await?;
        let upload: UploadResponse = serde_json::from_str(&body)?;

        Ok(FileData {
            mime_type: upload.file.mime_type,
            file_uri: upload.file.uri,
        })
    }

    /// Send one synchronous generateContent request.
    ///
    /// The request always demands JSON output at the configured
    /// temperature. A thinking budget of 0 sends no thinking config at
    /// all, which disables thinking for these models.
    pub async fn generate(
        &self,
        model: &str,
        contents: Vec<Content>,
        thinking_budget: u32,
    ) -> Result<Generation> {
        let thinking_config = (thinking_budget > 0).then_some(ThinkingConfig {
            thinking_budget,
        });

        let request = GenerateContentRequest {
            contents,
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                temperature: self.config.temperature,
                thinking_config,
            },
        };

        let response = self
            .http
            .post(self.generate_endpoint(model))
            .header("x-goog-api-key", &self.config.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let body = Self::check_status(response).await?;
        let completion: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| ExtractError::Parse(format!("Failed to decode response: {}", e)))?;

        Ok(Generation {
            text: completion.text(),
            usage: completion.usage_metadata,
        })
    }

    /// Read the response body, turning non-2xx statuses into typed errors.
    async fn check_status(response: reqwest::Response) -> Result<String> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Try to parse as API error
            if let Ok(api_error) = serde_json::from_str::<ApiErrorBody>(&body) {
                return Err(ExtractError::Api(format!(
                    "API error ({}): {}",
                    status, api_error.error.message
                )));
            }
            return Err(ExtractError::Api(format!(
                "Request failed ({}): {}",
                status, body
            )));
        }

        Ok(body)
    }

    /// Test connectivity to the API with a minimal text-only request.
    pub async fn test_connection(&self, model: &str) -> Result<()> {
        let contents = vec![Content::user(vec![Part::text(
            "Return the JSON object {\"status\": \"ok\"} and nothing else.",
        )])];

        let generation = self.generate(model, contents, 0).await?;

        match generation.text {
            Some(text) if text.contains("ok") => Ok(()),
            Some(text) => Err(ExtractError::Api(format!("Unexpected response: {}", text))),
            None => Err(ExtractError::Api("Empty response".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(api_base: &str) -> GeminiConfig {
        GeminiConfig {
            api_base: api_base.to_string(),
            api_key: "test-key".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_endpoint_construction() {
        let client = GeminiClient::new(test_config("https://api.example.com/"));
        assert_eq!(
            client.generate_endpoint("models/gemini-2.5-flash-lite"),
            "https://api.example.com/v1beta/models/gemini-2.5-flash-lite:generateContent"
        );
        assert_eq!(
            client.upload_endpoint(),
            "https://api.example.com/upload/v1beta/files"
        );

        // Without trailing slash
        let client = GeminiClient::new(test_config("https://api.example.com"));
        assert_eq!(
            client.generate_endpoint("models/gemini-2.5-flash-lite"),
            "https://api.example.com/v1beta/models/gemini-2.5-flash-lite:generateContent"
        );
    }

    #[tokio::test]
    async fn test_generate_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/test-model:generateContent")
            .with_status(200)
            .with_body(
                r#"{
                    "candidates": [{"content": {"role": "model", "parts": [{"text": "{\"a\": 1}"}]}}],
                    "usageMetadata": {"promptTokenCount": 20, "candidatesTokenCount": 10, "thoughtsTokenCount": 5, "totalTokenCount": 35}
                }"#,
            )
            .create();

        let client = GeminiClient::new(test_config(&server.url()));
        let contents = vec![Content::user(vec![Part::text("extract")])];
        let generation = client
            .generate("models/test-model", contents, 2000)
            .await
            .unwrap();

        mock.assert();
        assert_eq!(generation.text.as_deref(), Some(r#"{"a": 1}"#));
        assert_eq!(generation.usage.prompt_token_count, 20);
        assert_eq!(generation.usage.candidates_token_count, 10);
        assert_eq!(generation.usage.thoughts_token_count, 5);
        assert_eq!(generation.usage.total_token_count, 35);
    }

    #[tokio::test]
    async fn test_generate_api_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/test-model:generateContent")
            .with_status(429)
            .with_body(r#"{"error": {"message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}}"#)
            .create();

        let client = GeminiClient::new(test_config(&server.url()));
        let contents = vec![Content::user(vec![Part::text("extract")])];
        let result = client.generate("models/test-model", contents, 0).await;

        mock.assert();
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Quota exceeded"));
    }

    #[tokio::test]
    async fn test_upload_image() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/upload/v1beta/files")
            .with_status(200)
            .with_body(
                r#"{"file": {"name": "files/abc123", "uri": "https://files.example/abc123", "mimeType": "image/jpeg"}}"#,
            )
            .create();

        let dir = tempfile::TempDir::new().unwrap();
        let image_path = dir.path().join("scan.jpg");
        std::fs::write(&image_path, b"\xff\xd8\xff\xe0jpegdata").unwrap();

        let client = GeminiClient::new(test_config(&server.url()));
        let handle = client.upload_image(&image_path).await.unwrap();

        mock.assert();
        assert_eq!(handle.file_uri, "https://files.example/abc123");
        assert_eq!(handle.mime_type, "image/jpeg");
    }

    #[tokio::test]
    async fn test_upload_missing_file() {
        let client = GeminiClient::new(test_config("http://127.0.0.1:1"));
        let result = client.upload_image(Path::new("/nonexistent/scan.jpg")).await;
        assert!(result.is_err());
    }
}
