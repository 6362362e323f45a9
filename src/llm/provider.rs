//! The text-generation contract and the provider factory.

use async_trait::async_trait;

use crate::config::{ProviderConfig, ProviderKind};
use crate::error::ProviderError;
use crate::llm::claude::ClaudeProvider;
use crate::llm::deepseek::DeepseekProvider;
use crate::llm::openai::OpenAiProvider;
use crate::llm::qwen::QwenProvider;

/// A hosted text-generation backend.
///
/// Implementations return the literal generated text with only leading and
/// trailing blank lines removed. An empty `system_instruction` sends no
/// system message at all.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommitProvider: Send + Sync {
    /// Which backend this is.
    fn kind(&self) -> ProviderKind;

    /// Send one prompt and return the raw generated text.
    async fn generate(
        &self,
        prompt: &str,
        system_instruction: &str,
        config: &ProviderConfig,
    ) -> Result<String, ProviderError>;
}

/// Construct the provider for `kind`.
pub fn create_provider(kind: ProviderKind) -> Box<dyn CommitProvider> {
    match kind {
        ProviderKind::Qwen => Box::new(QwenProvider::new()),
        ProviderKind::OpenAi => Box::new(OpenAiProvider::new()),
        ProviderKind::Claude => Box::new(ClaudeProvider::new()),
        ProviderKind::Deepseek => Box::new(DeepseekProvider::new()),
    }
}
