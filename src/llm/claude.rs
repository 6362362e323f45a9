//! Anthropic messages API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{ProviderConfig, ProviderKind};
use crate::error::ProviderError;
use crate::llm::http::{decode, endpoint, finish_text, require_api_key, send};
use crate::llm::provider::CommitProvider;

const ANTHROPIC_API_BASE: &str = "https://api.anthropic.com";
const MESSAGES_PATH: &str = "/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: [UserMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct UserMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl<'a> MessagesRequest<'a> {
    fn new(prompt: &'a str, system_instruction: &'a str, config: &'a ProviderConfig) -> Self {
        Self {
            model: &config.model,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            system: (!system_instruction.is_empty()).then_some(system_instruction),
            messages: [UserMessage {
                role: "user",
                content: prompt,
            }],
        }
    }
}

impl MessagesResponse {
    /// Concatenated text of every `text` block; `None` if there are none.
    fn into_text(self) -> Option<String> {
        let texts: Vec<String> = self
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();
        (!texts.is_empty()).then(|| texts.concat())
    }
}

/// Anthropic messages API provider.
pub struct ClaudeProvider {
    client: Client,
}

impl ClaudeProvider {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for ClaudeProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommitProvider for ClaudeProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Claude
    }

    async fn generate(
        &self,
        prompt: &str,
        system_instruction: &str,
        config: &ProviderConfig,
    ) -> Result<String, ProviderError> {
        let provider = self.kind();
        let api_key = require_api_key(config)?;
        let url = endpoint(config, ANTHROPIC_API_BASE, MESSAGES_PATH);
        let request = MessagesRequest::new(prompt, system_instruction, config);

        debug!(
            "Requesting claude message with {} (prompt {} chars)",
            config.model,
            prompt.len()
        );

        let body = send(
            provider,
            self.client
                .post(&url)
                .header("x-api-key", api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&request),
        )
        .await?;

        let response: MessagesResponse = decode(provider, &body)?;
        finish_text(provider, response.into_text())
    }
}
