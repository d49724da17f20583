//! Text generation through Google Gemini.
//!
//! [`TextGenerator::generate`] reports failures through [`GenerationError`]; the HTTP surface
//! calls [`GenerationApi::generate_text`], which never fails and folds every error into one of
//! the fixed messages below. Callers of that boundary only ever see a string.

mod gemini;
mod types;

pub use gemini::GeminiClient;
pub use types::{
    Candidate, Content, FinishReason, GenerateContentRequest, GenerateContentResponse, Part,
    PromptFeedback,
};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Model used when the caller does not pick one.
pub const DEFAULT_MODEL: &str = AiModel::Gemini15Flash.as_str();

/// Returned for every call when no API key was configured.
pub const MISSING_API_KEY_MESSAGE: &str = "Error: Google API Key not configured.";
/// Returned when the provider answered without any candidate.
pub const NO_RESPONSE_MESSAGE: &str =
    "Error: No response generated (potentially due to safety settings).";
/// Returned for transport, status and decoding failures.
pub const INTERNAL_ERROR_MESSAGE: &str = "Error generating text: An internal error occurred.";

/// Errors surfaced while generating text.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// No API key was configured at startup.
    #[error("Google API key not configured")]
    MissingApiKey,
    /// Provider returned an empty candidate list.
    #[error("No candidates returned from Gemini API")]
    NoCandidates,
    /// Request never produced an HTTP response.
    #[error("Gemini request failed: {0}")]
    Transport(String),
    /// Provider returned a non-success status.
    #[error("Gemini returned {status}: {body}")]
    Status {
        /// HTTP status reported by the provider.
        status: StatusCode,
        /// Raw response body, kept for logs only.
        body: String,
    },
    /// Provider response could not be parsed.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
}

impl GenerationError {
    /// Fixed, caller-facing message for this failure. Never includes provider detail.
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::MissingApiKey => MISSING_API_KEY_MESSAGE,
            Self::NoCandidates => NO_RESPONSE_MESSAGE,
            Self::Transport(_) | Self::Status { .. } | Self::InvalidResponse(_) => {
                INTERNAL_ERROR_MESSAGE
            }
        }
    }
}

/// Gemini models offered to the frontend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiModel {
    /// Faster, less accurate.
    #[default]
    #[serde(rename = "gemini-1.5-flash")]
    Gemini15Flash,
    /// Slower, more accurate.
    #[serde(rename = "gemini-2.5-pro-exp-03-25")]
    Gemini25ProExp,
}

impl AiModel {
    /// Every selectable model, default first.
    pub const ALL: [AiModel; 2] = [AiModel::Gemini15Flash, AiModel::Gemini25ProExp];

    /// Provider model identifier.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gemini15Flash => "gemini-1.5-flash",
            Self::Gemini25ProExp => "gemini-2.5-pro-exp-03-25",
        }
    }
}

/// Settings required to build a [`TextGenerator`].
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    /// Gemini API key; `None` makes every call fail closed without network access.
    pub api_key: Option<String>,
    /// Base URL of the Gemini REST API.
    pub base_url: String,
    /// Model used when a call does not name one.
    pub default_model: String,
}

/// Transport seam for the generative-model endpoint.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Send `prompt` to `model` and return the decoded provider response.
    async fn generate_content(
        &self,
        model: &str,
        prompt: &str,
    ) -> Result<GenerateContentResponse, GenerationError>;
}

/// Abstraction over text generation used by the HTTP surface.
#[async_trait]
pub trait GenerationApi: Send + Sync {
    /// Generate text for `prompt`, folding every failure into a fixed message.
    async fn generate_text(&self, prompt: &str, model: Option<&str>) -> String;

    /// Model used when a request does not name one.
    fn default_model(&self) -> &str;
}

/// Normalizes Gemini responses and failures into plain strings.
pub struct TextGenerator {
    client: Option<Box<dyn GenerationClient>>,
    default_model: String,
}

impl TextGenerator {
    /// Build a generator from settings. Without an API key no client is created at all.
    pub fn new(settings: GenerationSettings) -> Result<Self, GenerationError> {
        let client = match settings.api_key {
            Some(api_key) => Some(Box::new(GeminiClient::new(settings.base_url, api_key)?)
                as Box<dyn GenerationClient>),
            None => None,
        };
        Ok(Self::with_client(client, settings.default_model))
    }

    /// Build a generator around an arbitrary client.
    pub fn with_client(
        client: Option<Box<dyn GenerationClient>>,
        default_model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            default_model: default_model.into(),
        }
    }

    /// Generate text, reporting failures as typed errors.
    ///
    /// A finish reason other than [`FinishReason::Stop`] is logged but not treated as a
    /// failure; whatever text the candidate carries is returned, possibly empty.
    pub async fn generate(
        &self,
        prompt: &str,
        model: Option<&str>,
    ) -> Result<String, GenerationError> {
        let Some(client) = self.client.as_deref() else {
            return Err(GenerationError::MissingApiKey);
        };
        let model = model
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(self.default_model.as_str());

        tracing::info!(model, "Generating text");
        let response = client.generate_content(model, prompt).await?;

        let Some(candidate) = response.candidates.first() else {
            tracing::warn!(
                block_reason = ?response.block_reason(),
                "No candidates returned from Gemini API"
            );
            return Err(GenerationError::NoCandidates);
        };

        match candidate.finish_reason {
            Some(FinishReason::Stop) => {}
            Some(reason) => tracing::warn!(finish_reason = %reason, "Generation finished early"),
            None => tracing::warn!("Gemini generation finished without a finish reason"),
        }

        tracing::info!(model, "Successfully received response from Gemini API");
        Ok(candidate.text())
    }
}

#[async_trait]
impl GenerationApi for TextGenerator {
    async fn generate_text(&self, prompt: &str, model: Option<&str>) -> String {
        match self.generate(prompt, model).await {
            Ok(text) => text,
            Err(error) => {
                match &error {
                    // Already warned about at startup and, for empty candidates, above.
                    GenerationError::MissingApiKey | GenerationError::NoCandidates => {}
                    other => tracing::error!(error = %other, "Error calling Google Gemini API"),
                }
                error.user_message().to_string()
            }
        }
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }
}
