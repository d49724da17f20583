//! reqwest transport for the Gemini REST API.

use super::types::{GenerateContentRequest, GenerateContentResponse};
use super::{GenerationClient, GenerationError};
use async_trait::async_trait;
use reqwest::Client;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Client for `POST {base_url}/v1beta/models/{model}:generateContent`.
pub struct GeminiClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl GeminiClient {
    /// Build a client authenticated with `api_key`. Request timeouts are reqwest's defaults.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, GenerationError> {
        let http = Client::builder()
            .user_agent(concat!("docgen/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|error| {
                GenerationError::Transport(format!("failed to construct HTTP client: {error}"))
            })?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model.trim_start_matches("models/")
        )
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate_content(
        &self,
        model: &str,
        prompt: &str,
    ) -> Result<GenerateContentResponse, GenerationError> {
        let response = self
            .http
            .post(self.endpoint(model))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&GenerateContentRequest::from_prompt(prompt))
            .send()
            .await
            .map_err(|error| {
                GenerationError::Transport(format!(
                    "failed to reach Gemini at {}: {error}",
                    self.base_url
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status { status, body });
        }

        response.json().await.map_err(|error| {
            GenerationError::InvalidResponse(format!("failed to decode Gemini response: {error}"))
        })
    }
}
