//! Remote completion seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CompletionError;

/// Role tag for a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Model,
}

/// One role-tagged turn of a multi-turn transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptTurn {
    pub role: TurnRole,
    pub text: String,
}

impl TranscriptTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Model,
            text: text.into(),
        }
    }
}

/// Outbound completion payload.
///
/// Callers pick the mode: a one-shot text prompt, or a role-tagged
/// multi-turn transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionPayload {
    Text(String),
    Transcript(Vec<TranscriptTurn>),
}

impl CompletionPayload {
    /// Full text content of the payload, regardless of mode.
    pub fn text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Transcript(turns) => turns
                .iter()
                .map(|t| t.text.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// Generation parameters, fixed per deployment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub top_k: Option<u32>,
    pub max_output_tokens: Option<u32>,
}

/// Remote completion API.
///
/// One request/response cycle; no retry, no cancellation. All failures
/// surface as [`CompletionError`] for the session controller to render.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Translate the payload into a provider request and return the
    /// assistant's response text.
    async fn complete(
        &self,
        payload: &CompletionPayload,
        api_key: &str,
    ) -> Result<String, CompletionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_text_one_shot() {
        let payload = CompletionPayload::Text("hello".to_string());
        assert_eq!(payload.text(), "hello");
    }

    #[test]
    fn test_payload_text_transcript() {
        let payload = CompletionPayload::Transcript(vec![
            TranscriptTurn::user("hi"),
            TranscriptTurn::model("hello"),
        ]);
        assert_eq!(payload.text(), "hi\nhello");
    }

    #[test]
    fn test_turn_role_serde() {
        assert_eq!(
            serde_json::to_string(&TurnRole::Model).unwrap(),
            r#""model""#
        );
    }

    #[test]
    fn test_generation_settings_default() {
        let settings = GenerationSettings::default();
        assert!(settings.temperature.is_none());
        assert!(settings.max_output_tokens.is_none());
    }
}
