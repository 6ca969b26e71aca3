use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::{BackendError, BackendResult};

const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const API_VERSION: &str = "2023-06-01";

/// Raw output of one generation call
#[derive(Debug, Clone)]
pub struct GenerativeResponse {
    pub text: String,
    pub model: String,
}

/// Opaque generative text capability injected into the orchestrator.
///
/// Structured text goes in, structured text or a failure comes out; the
/// caller owns prompt construction and response parsing.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    async fn generate(
        &self,
        system: &str,
        prompt: &str,
        max_tokens: u32,
    ) -> BackendResult<GenerativeResponse>;

    fn model_name(&self) -> &str;
}

/// Configuration for the messages-API backend
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub request_timeout: Duration,
}

impl BackendConfig {
    /// Build from the environment; `None` when no key is configured.
    /// A missing backend is an expected state, not an error.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY").ok()?;
        if api_key.is_empty() {
            return None;
        }
        Some(Self {
            api_url: std::env::var("LLM_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            api_key,
            model: std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            request_timeout: Duration::from_secs(30),
        })
    }
}

#[derive(Serialize)]
struct MessageRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessageResponse {
    content: Vec<ContentBlock>,
    model: String,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

/// Messages-API-shaped HTTP backend
pub struct AnthropicBackend {
    client: reqwest::Client,
    config: BackendConfig,
}

impl AnthropicBackend {
    pub fn new(config: BackendConfig) -> BackendResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl GenerativeBackend for AnthropicBackend {
    async fn generate(
        &self,
        system: &str,
        prompt: &str,
        max_tokens: u32,
    ) -> BackendResult<GenerativeResponse> {
        let request = MessageRequest {
            model: &self.config.model,
            max_tokens,
            system,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Api { status, body });
        }

        let parsed: MessageResponse = response.json().await?;
        let text: String = parsed
            .content
            .iter()
            .filter(|block| block.content_type == "text")
            .filter_map(|block| block.text.as_deref())
            .collect::<Vec<_>>()
            .join("\n");

        if text.is_empty() {
            return Err(BackendError::EmptyResponse);
        }

        debug!(model = %parsed.model, chars = text.len(), "backend generation complete");
        Ok(GenerativeResponse {
            text,
            model: parsed.model,
        })
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_messages_shape() {
        let request = MessageRequest {
            model: "test-model",
            max_tokens: 512,
            system: "You are an analyst.",
            messages: vec![Message {
                role: "user",
                content: "Summarize.",
            }],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "test-model");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["max_tokens"], 512);
    }

    #[test]
    fn response_text_blocks_are_joined() {
        let raw = serde_json::json!({
            "content": [
                {"type": "text", "text": "line one"},
                {"type": "tool_use"},
                {"type": "text", "text": "line two"}
            ],
            "model": "test-model"
        });

        let parsed: MessageResponse = serde_json::from_value(raw).unwrap();
        let text: String = parsed
            .content
            .iter()
            .filter(|b| b.content_type == "text")
            .filter_map(|b| b.text.as_deref())
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(text, "line one\nline two");
    }
}
