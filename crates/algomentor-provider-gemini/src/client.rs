//! Gemini API client.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use algomentor_protocols::{
    CompletionError, CompletionPayload, CompletionProvider, GenerationSettings, TurnRole,
};

use crate::types::*;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model for the helper deployment.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Gemini API client.
///
/// One HTTP POST per completion; no retry, no cancellation. The
/// credential travels as a query parameter, supplied per call so a
/// settings change takes effect without rebuilding the client.
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    generation_config: Option<GenerationConfig>,
}

impl GeminiClient {
    /// Create a new Gemini client with deployment-fixed generation
    /// settings.
    pub fn new(model: impl Into<String>, settings: GenerationSettings) -> Self {
        let generation_config = if settings == GenerationSettings::default() {
            None
        } else {
            Some(GenerationConfig {
                temperature: settings.temperature,
                top_p: settings.top_p,
                top_k: settings.top_k,
                max_output_tokens: settings.max_output_tokens,
            })
        };

        Self {
            client: Client::builder()
                .connect_timeout(std::time::Duration::from_secs(10))
                .timeout(std::time::Duration::from_secs(300))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: BASE_URL.to_string(),
            model: model.into(),
            generation_config,
        }
    }

    /// Point the client at a different endpoint (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn convert_payload(&self, payload: &CompletionPayload) -> Vec<Content> {
        match payload {
            CompletionPayload::Text(text) => vec![Content::new("user", text.clone())],
            CompletionPayload::Transcript(turns) => turns
                .iter()
                .map(|turn| {
                    let role = match turn.role {
                        TurnRole::User => "user",
                        TurnRole::Model => "model",
                    };
                    Content::new(role, turn.text.clone())
                })
                .collect(),
        }
    }

    /// Generate content for the payload.
    pub async fn generate(
        &self,
        payload: &CompletionPayload,
        api_key: &str,
    ) -> Result<String, CompletionError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, api_key
        );

        let request = GenerateContentRequest {
            contents: self.convert_payload(payload),
            generation_config: self.generation_config.clone(),
        };

        debug!("Gemini generate: model={}", self.model);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| CompletionError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CompletionError::Network(e.to_string()))?;

        if !status.is_success() {
            let error: Result<GeminiError, _> = serde_json::from_str(&body);
            return match error {
                Ok(e) => Err(CompletionError::Api {
                    status: status.as_u16(),
                    message: e.error.message,
                }),
                Err(_) => Err(CompletionError::Api {
                    status: status.as_u16(),
                    message: body,
                }),
            };
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            CompletionError::MalformedResponse(format!("Failed to parse response: {}", e))
        })?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text);

        match text {
            Some(text) => Ok(text),
            None => {
                // A success status can still carry an explicit error object.
                if let Ok(e) = serde_json::from_str::<GeminiError>(&body) {
                    return Err(CompletionError::Api {
                        status: status.as_u16(),
                        message: e.error.message,
                    });
                }
                warn!("Gemini response carried no candidate text");
                Err(CompletionError::MalformedResponse(
                    "response carried no candidate text".to_string(),
                ))
            }
        }
    }
}

#[async_trait]
impl CompletionProvider for GeminiClient {
    async fn complete(
        &self,
        payload: &CompletionPayload,
        api_key: &str,
    ) -> Result<String, CompletionError> {
        self.generate(payload, api_key).await
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
