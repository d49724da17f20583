//! Wire types for the Gemini `generateContent` endpoint.
//!
//! Only the fields this service reads are modelled; everything else in the provider payload is
//! ignored by serde.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    /// Conversation turns; a single user turn for plain prompts.
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// Wrap a bare prompt as one user turn.
    pub fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        }
    }
}

/// One turn of content, either sent by the user or produced by the model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    /// `user` or `model`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Ordered parts making up the turn.
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A content part. Non-text parts (inline data, function calls) deserialize with `text: None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Part {
    /// Text payload of the part.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Response body for `generateContent`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Generated options; empty when the prompt was blocked.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Feedback on the prompt itself.
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

impl GenerateContentResponse {
    /// Block reason reported for the prompt, if the provider refused it outright.
    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_deref())
    }
}

/// One generated response option.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content, absent when the candidate was filtered.
    #[serde(default)]
    pub content: Option<Content>,
    /// Why generation stopped.
    #[serde(default)]
    pub finish_reason: Option<FinishReason>,
}

impl Candidate {
    /// Concatenated text of every text part. Empty when the candidate carries no text.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .flat_map(|content| content.parts.iter())
            .filter_map(|part| part.text.as_deref())
            .collect()
    }
}

/// Provider verdict on the prompt.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Set when the prompt was refused before generation.
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// Why the model stopped generating a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinishReason {
    /// Provider did not say.
    FinishReasonUnspecified,
    /// Natural stop point or a provided stop sequence.
    Stop,
    /// Token limit reached.
    MaxTokens,
    /// Flagged by the safety filters.
    Safety,
    /// Flagged as reciting training data.
    Recitation,
    /// Unsupported language.
    Language,
    /// Unspecified other reason.
    Other,
    /// Matched a blocklisted term.
    Blocklist,
    /// Potentially prohibited content.
    ProhibitedContent,
    /// Sensitive personally identifiable information.
    Spii,
    /// Model emitted an invalid function call.
    MalformedFunctionCall,
    /// Any value this build does not know about yet.
    #[serde(other)]
    Unknown,
}

impl FinishReason {
    /// Provider spelling of the reason.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FinishReasonUnspecified => "FINISH_REASON_UNSPECIFIED",
            Self::Stop => "STOP",
            Self::MaxTokens => "MAX_TOKENS",
            Self::Safety => "SAFETY",
            Self::Recitation => "RECITATION",
            Self::Language => "LANGUAGE",
            Self::Other => "OTHER",
            Self::Blocklist => "BLOCKLIST",
            Self::ProhibitedContent => "PROHIBITED_CONTENT",
            Self::Spii => "SPII",
            Self::MalformedFunctionCall => "MALFORMED_FUNCTION_CALL",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for FinishReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
