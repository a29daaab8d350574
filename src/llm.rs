//! Chat-completion client for the hosted inference endpoint.
//!
//! Defines the [`ChatModel`] seam and its production implementation,
//! [`GroqChat`], which speaks the OpenAI-compatible chat-completions
//! protocol against the configured base URL (Groq by default). Answers
//! must be reproducible, so decoding is deterministic — temperature
//! comes from config and defaults to zero.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::LlmConfig;

/// Seam over the hosted chat-completion service.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send one prompt as a single user message and return the model's
    /// raw text reply.
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// The model identifier (e.g. `"llama-3.3-70b-versatile"`).
    fn model_name(&self) -> &str;
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Chat client backed by an OpenAI-compatible endpoint.
///
/// Requires the `GROQ_API_KEY` environment variable.
pub struct GroqChat {
    client: reqwest::Client,
    api_key: String,
    config: LlmConfig,
}

impl GroqChat {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = std::env::var("GROQ_API_KEY")
            .map_err(|_| anyhow::anyhow!("GROQ_API_KEY environment variable not set"))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key,
            config: config.clone(),
        })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl ChatModel for GroqChat {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.config.temperature,
        };

        let url = self.completions_url();
        let mut last_err = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                tokio::time::sleep(delay).await;
            }

            let resp = self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .header("Content-Type", "application/json")
                .json(&body)
                .send()
                .await;

            match resp {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        let parsed: ChatResponse =
                            response.json().await.context("Invalid chat response")?;
                        return extract_reply(parsed);
                    }

                    if status.as_u16() == 429 || status.is_server_error() {
                        let body_text = response.text().await.unwrap_or_default();
                        last_err =
                            Some(anyhow::anyhow!("Chat API error {}: {}", status, body_text));
                        continue;
                    }

                    let body_text = response.text().await.unwrap_or_default();
                    bail!("Chat API error {}: {}", status, body_text);
                }
                Err(e) => {
                    last_err = Some(e.into());
                    continue;
                }
            }
        }

        Err(last_err.unwrap_or_else(|| anyhow::anyhow!("Chat completion failed after retries")))
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// First choice's message content, verbatim. No truncation or
/// post-processing — the caller displays the reply as-is.
fn extract_reply(response: ChatResponse) -> Result<String> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("Chat response contained no choices"))?;

    choice
        .message
        .content
        .ok_or_else(|| anyhow::anyhow!("Chat response contained no message content"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_reply_first_choice() {
        let response: ChatResponse = serde_json::from_value(serde_json::json!({
            "choices": [
                {"message": {"role": "assistant", "content": "Phase 2 has started."}},
                {"message": {"role": "assistant", "content": "ignored"}}
            ]
        }))
        .unwrap();
        assert_eq!(extract_reply(response).unwrap(), "Phase 2 has started.");
    }

    #[test]
    fn test_extract_reply_no_choices() {
        let response: ChatResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        let err = extract_reply(response).unwrap_err();
        assert!(err.to_string().contains("no choices"));
    }

    #[test]
    fn test_extract_reply_null_content() {
        let response: ChatResponse = serde_json::from_value(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": null}}]
        }))
        .unwrap();
        let err = extract_reply(response).unwrap_err();
        assert!(err.to_string().contains("no message content"));
    }

    #[test]
    fn test_completions_url_trims_trailing_slash() {
        let config = LlmConfig {
            base_url: "https://api.groq.com/openai/v1/".to_string(),
            ..LlmConfig::default()
        };
        std::env::set_var("GROQ_API_KEY", "test-key");
        let chat = GroqChat::new(&config).unwrap();
        assert_eq!(
            chat.completions_url(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }
}
