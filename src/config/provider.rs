//! Provider selection and validated generation parameters.

use std::env;
use std::fmt;
use std::str::FromStr;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::config::settings::Settings;
use crate::error::ConfigError;

/// Environment variable that redirects every provider to another endpoint.
pub const BASE_URL_ENV_VAR: &str = "AICOMMIT_BASE_URL";

const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_MAX_TOKENS: u32 = 500;

/// Supported text-generation backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Qwen,
    OpenAi,
    Claude,
    Deepseek,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Qwen => "qwen",
            ProviderKind::OpenAi => "openai",
            ProviderKind::Claude => "claude",
            ProviderKind::Deepseek => "deepseek",
        }
    }

    /// Model used when neither settings nor flags name one.
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Qwen => "qwen-max",
            ProviderKind::OpenAi => "gpt-4o",
            ProviderKind::Claude => "claude-3-5-sonnet-latest",
            ProviderKind::Deepseek => "deepseek-chat",
        }
    }

    pub fn all() -> &'static [ProviderKind] {
        &[
            ProviderKind::Qwen,
            ProviderKind::OpenAi,
            ProviderKind::Claude,
            ProviderKind::Deepseek,
        ]
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "qwen" => Ok(ProviderKind::Qwen),
            "openai" => Ok(ProviderKind::OpenAi),
            "claude" => Ok(ProviderKind::Claude),
            "deepseek" => Ok(ProviderKind::Deepseek),
            _ => Err(ConfigError::UnsupportedProvider(s.to_string())),
        }
    }
}

/// Language of the system instruction and report prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "zh-CN")]
    ZhCn,
    #[serde(rename = "zh-TW")]
    ZhTw,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::ZhCn => "zh-CN",
            Language::ZhTw => "zh-TW",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "en" => Ok(Language::En),
            "zh" | "zh-CN" => Ok(Language::ZhCn),
            "zh-TW" => Ok(Language::ZhTw),
            _ => Err(ConfigError::UnsupportedLanguage(s.to_string())),
        }
    }
}

/// Explicit per-run values that win over persisted settings.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub provider: Option<ProviderKind>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub language: Option<Language>,
    pub base_url: Option<String>,
}

/// Everything a provider needs for one generation call.
///
/// Temperature and max_tokens are validated here; the API key is only
/// checked right before a request so a missing key surfaces as an
/// authentication failure.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub provider_kind: ProviderKind,
    pub api_key: SecretString,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub language: Language,
    /// Endpoint override; `None` uses the provider's public endpoint.
    pub base_url: Option<String>,
}

impl ProviderConfig {
    pub fn new(
        provider_kind: ProviderKind,
        api_key: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
        max_tokens: u32,
        language: Language,
    ) -> Result<Self, ConfigError> {
        if !temperature.is_finite() || !(0.0..=1.0).contains(&temperature) {
            return Err(ConfigError::InvalidTemperature(temperature));
        }
        if max_tokens == 0 {
            return Err(ConfigError::InvalidMaxTokens);
        }

        Ok(Self {
            provider_kind,
            api_key: SecretString::from(api_key.into()),
            model: model.into(),
            temperature,
            max_tokens,
            language,
            base_url: None,
        })
    }

    /// Config with default model, temperature and token budget for `kind`.
    pub fn with_defaults(
        provider_kind: ProviderKind,
        api_key: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Self::new(
            provider_kind,
            api_key,
            provider_kind.default_model(),
            DEFAULT_TEMPERATURE,
            DEFAULT_MAX_TOKENS,
            Language::default(),
        )
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Merge persisted settings with explicit overrides.
    ///
    /// Explicit overrides win, then `AICOMMIT_BASE_URL` for the endpoint,
    /// then the persisted model and endpoint of the default provider.
    pub fn from_settings(
        settings: &Settings,
        overrides: &ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let kind = overrides.provider.unwrap_or(settings.default_provider);
        let api_key = settings.api_key(kind).unwrap_or_default().to_string();
        let model = overrides
            .model
            .clone()
            .or_else(|| settings.model_for(kind).map(str::to_string))
            .unwrap_or_else(|| kind.default_model().to_string());

        let mut config = Self::new(
            kind,
            api_key,
            model,
            overrides.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            overrides.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            overrides.language.unwrap_or(settings.language),
        )?;

        config.base_url = overrides
            .base_url
            .clone()
            .or_else(|| env::var(BASE_URL_ENV_VAR).ok().filter(|v| !v.is_empty()))
            .or_else(|| settings.base_url_for(kind).map(str::to_string));

        Ok(config)
    }
}
