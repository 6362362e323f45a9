//! OpenAI chat completions.
//!
//! The chat request shape here is shared with DeepSeek, which serves the
//! same API at a different host.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{ProviderConfig, ProviderKind};
use crate::error::ProviderError;
use crate::llm::http::{decode, endpoint, finish_text, require_api_key, send};
use crate::llm::provider::CommitProvider;

const OPENAI_API_BASE: &str = "https://api.openai.com";
pub(crate) const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl<'a> ChatRequest<'a> {
    pub(crate) fn new(
        prompt: &'a str,
        system_instruction: &'a str,
        config: &'a ProviderConfig,
    ) -> Self {
        let mut messages = Vec::with_capacity(2);
        if !system_instruction.is_empty() {
            messages.push(ChatMessage {
                role: "system",
                content: system_instruction,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });

        Self {
            model: &config.model,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            messages,
        }
    }
}

/// POST a chat completion to `url` and unwrap `choices[0].message.content`.
pub(crate) async fn chat_completion(
    client: &Client,
    provider: ProviderKind,
    url: &str,
    prompt: &str,
    system_instruction: &str,
    config: &ProviderConfig,
) -> Result<String, ProviderError> {
    let api_key = require_api_key(config)?;
    let request = ChatRequest::new(prompt, system_instruction, config);

    debug!(
        "Requesting {provider} chat completion with {} (prompt {} chars)",
        config.model,
        prompt.len()
    );

    let body = send(
        provider,
        client
            .post(url)
            .header(AUTHORIZATION, format!("Bearer {api_key}"))
            .json(&request),
    )
    .await?;

    let response: ChatResponse = decode(provider, &body)?;
    let text = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content);
    finish_text(provider, text)
}

/// OpenAI chat completions provider.
pub struct OpenAiProvider {
    client: Client,
}

impl OpenAiProvider {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for OpenAiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommitProvider for OpenAiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    async fn generate(
        &self,
        prompt: &str,
        system_instruction: &str,
        config: &ProviderConfig,
    ) -> Result<String, ProviderError> {
        let url = endpoint(config, OPENAI_API_BASE, CHAT_COMPLETIONS_PATH);
        chat_completion(
            &self.client,
            self.kind(),
            &url,
            prompt,
            system_instruction,
            config,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_request_shape() {
        let config = ProviderConfig::with_defaults(ProviderKind::OpenAi, "k").unwrap();
        let request = ChatRequest::new("the prompt", "the rules", &config);
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["model"], "gpt-4o");
        assert_eq!(value["max_tokens"], 500);
        assert_eq!(
            value["messages"],
            json!([
                {"role": "system", "content": "the rules"},
                {"role": "user", "content": "the prompt"}
            ])
        );
    }

    #[test]
    fn test_chat_request_without_system_instruction() {
        let config = ProviderConfig::with_defaults(ProviderKind::OpenAi, "k").unwrap();
        let value = serde_json::to_value(ChatRequest::new("hi", "", &config)).unwrap();
        assert_eq!(value["messages"], json!([{"role": "user", "content": "hi"}]));
    }
}
