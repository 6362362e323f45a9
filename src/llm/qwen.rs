//! Qwen through the DashScope text-generation API.
//!
//! DashScope takes a single prompt string rather than a message list, so
//! the system instruction is prepended to the prompt.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{ProviderConfig, ProviderKind};
use crate::error::ProviderError;
use crate::llm::http::{decode, endpoint, finish_text, require_api_key, send};
use crate::llm::provider::CommitProvider;

const DASHSCOPE_API_BASE: &str = "https://dashscope.aliyuncs.com";
const GENERATION_PATH: &str = "/api/v1/services/aigc/text-generation/generation";

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    model: &'a str,
    input: Input,
    parameters: Parameters,
}

#[derive(Debug, Serialize)]
struct Input {
    prompt: String,
}

#[derive(Debug, Serialize)]
struct Parameters {
    temperature: f32,
    max_tokens: u32,
    result_format: &'static str,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    output: Option<Output>,
}

#[derive(Debug, Deserialize)]
struct Output {
    #[serde(default)]
    text: Option<String>,
}

impl<'a> GenerationRequest<'a> {
    fn new(prompt: &str, system_instruction: &str, config: &'a ProviderConfig) -> Self {
        let prompt = if system_instruction.is_empty() {
            prompt.to_string()
        } else {
            format!("{system_instruction}\n\n{prompt}")
        };

        Self {
            model: &config.model,
            input: Input { prompt },
            parameters: Parameters {
                temperature: config.temperature,
                max_tokens: config.max_tokens,
                result_format: "text",
            },
        }
    }
}

/// Alibaba DashScope (Qwen) text-generation provider.
pub struct QwenProvider {
    client: Client,
}

impl QwenProvider {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for QwenProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommitProvider for QwenProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Qwen
    }

    async fn generate(
        &self,
        prompt: &str,
        system_instruction: &str,
        config: &ProviderConfig,
    ) -> Result<String, ProviderError> {
        let provider = self.kind();
        let api_key = require_api_key(config)?;
        let url = endpoint(config, DASHSCOPE_API_BASE, GENERATION_PATH);
        let request = GenerationRequest::new(prompt, system_instruction, config);

        debug!(
            "Requesting qwen generation with {} (prompt {} chars)",
            config.model,
            request.input.prompt.len()
        );

        let body = send(
            provider,
            self.client
                .post(&url)
                .header(AUTHORIZATION, format!("Bearer {api_key}"))
                .json(&request),
        )
        .await?;

        let response: GenerationResponse = decode(provider, &body)?;
        finish_text(provider, response.output.and_then(|o| o.text))
    }
}
