//! Persisted settings: per-provider API keys and defaults.
//!
//! Stored as JSON at `~/.config/aicommit/config.json`. A missing or corrupt
//! file is never fatal; it simply means "use the defaults".

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::provider::{Language, ProviderKind};
use crate::error::ConfigError;

/// Environment variable to override the settings file location.
pub const CONFIG_PATH_ENV_VAR: &str = "AICOMMIT_CONFIG";

/// User settings loaded once at start.
///
/// The setters only change the in-memory value; call [`Settings::save`]
/// once after applying them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qwen_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claude_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepseek_api_key: Option<String>,
    #[serde(default)]
    pub default_provider: ProviderKind,
    #[serde(default)]
    pub language: Language,
    /// Model for the default provider; other providers use their own default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Endpoint origin for the default provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Settings {
    /// Resolve the settings file path.
    ///
    /// Honors `AICOMMIT_CONFIG` when set, otherwise
    /// `<home>/.config/aicommit/config.json`.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
            if !path.is_empty() {
                return Ok(PathBuf::from(path));
            }
        }

        let dirs = BaseDirs::new().ok_or(ConfigError::NoHomeDirectory)?;
        Ok(dirs
            .home_dir()
            .join(".config")
            .join("aicommit")
            .join("config.json"))
    }

    /// Load settings from the default location, falling back to defaults.
    pub fn load() -> Self {
        match Self::config_path() {
            Ok(path) => Self::load_from(&path),
            Err(e) => {
                warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    /// Load settings from `path`, falling back to defaults on any failure.
    pub fn load_from(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No settings file at {}", path.display());
                return Self::default();
            }
            Err(e) => {
                warn!("Cannot read settings file {}: {e}", path.display());
                return Self::default();
            }
        };

        serde_json::from_str(&contents).unwrap_or_else(|e| {
            warn!("Ignoring invalid settings file {}: {e}", path.display());
            Self::default()
        })
    }

    /// Save settings to the default location and return the path written.
    ///
    /// Writes are not coordinated between processes: two concurrent
    /// invocations that both save will leave whichever wrote last.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save settings to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_failed = |source| ConfigError::WriteFailed {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_failed)?;
        }

        let data = serde_json::to_string_pretty(self).map_err(ConfigError::SerializeFailed)?;
        fs::write(path, data).map_err(write_failed)?;
        debug!("Saved settings to {}", path.display());
        Ok(())
    }

    /// API key stored for `kind`, if any.
    pub fn api_key(&self, kind: ProviderKind) -> Option<&str> {
        let key = match kind {
            ProviderKind::Qwen => &self.qwen_api_key,
            ProviderKind::OpenAi => &self.openai_api_key,
            ProviderKind::Claude => &self.claude_api_key,
            ProviderKind::Deepseek => &self.deepseek_api_key,
        };
        key.as_deref().filter(|k| !k.is_empty())
    }

    /// Store `api_key` for `kind`.
    pub fn set_api_key(&mut self, kind: ProviderKind, api_key: impl Into<String>) {
        let slot = match kind {
            ProviderKind::Qwen => &mut self.qwen_api_key,
            ProviderKind::OpenAi => &mut self.openai_api_key,
            ProviderKind::Claude => &mut self.claude_api_key,
            ProviderKind::Deepseek => &mut self.deepseek_api_key,
        };
        *slot = Some(api_key.into());
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn set_default_provider(&mut self, kind: ProviderKind) {
        self.default_provider = kind;
    }

    /// Store the model; an empty value clears it.
    pub fn set_model(&mut self, model: &str) {
        self.model = non_empty(model);
    }

    /// Store the endpoint origin; an empty value clears it.
    pub fn set_base_url(&mut self, base_url: &str) {
        self.base_url = non_empty(base_url);
    }

    /// Persisted model, when it applies to `kind`.
    pub fn model_for(&self, kind: ProviderKind) -> Option<&str> {
        self.model
            .as_deref()
            .filter(|_| kind == self.default_provider)
    }

    /// Persisted endpoint origin, when it applies to `kind`.
    pub fn base_url_for(&self, kind: ProviderKind) -> Option<&str> {
        self.base_url
            .as_deref()
            .filter(|_| kind == self.default_provider)
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Mask a secret for display, keeping a short prefix and suffix.
pub fn mask_secret(value: Option<&str>) -> String {
    match value {
        Some(key) if key.chars().count() > 8 => {
            let prefix: String = key.chars().take(4).collect();
            let suffix: String = key
                .chars()
                .rev()
                .take(4)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            format!("{prefix}...{suffix}")
        }
        Some(key) if !key.is_empty() => "***".to_string(),
        _ => "<not set>".to_string(),
    }
}
