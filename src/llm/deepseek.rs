//! DeepSeek, served through an OpenAI-compatible chat API.

use async_trait::async_trait;
use reqwest::Client;

use crate::config::{ProviderConfig, ProviderKind};
use crate::error::ProviderError;
use crate::llm::http::endpoint;
use crate::llm::openai::{CHAT_COMPLETIONS_PATH, chat_completion};
use crate::llm::provider::CommitProvider;

const DEEPSEEK_API_BASE: &str = "https://api.deepseek.com";

/// DeepSeek provider, speaking the OpenAI chat completions shape.
pub struct DeepseekProvider {
    client: Client,
}

impl DeepseekProvider {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for DeepseekProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommitProvider for DeepseekProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Deepseek
    }

    async fn generate(
        &self,
        prompt: &str,
        system_instruction: &str,
        config: &ProviderConfig,
    ) -> Result<String, ProviderError> {
        let url = endpoint(config, DEEPSEEK_API_BASE, CHAT_COMPLETIONS_PATH);
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
