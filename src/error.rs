//! Error types for aicommit modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ProviderKind;
use crate::git::ChangeScope;

/// Errors from repository inspection and commit creation.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Not a git repository (searched from {} and its parents)", .path.display())]
    NotARepository {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("No {scope} changes found. {hint}", hint = .scope.hint())]
    NoChanges { scope: ChangeScope },

    #[error(
        "Other changes are already staged ({}). Commit or unstage them before using --unstaged.",
        .paths.join(", ")
    )]
    StagedChangesPresent { paths: Vec<String> },

    #[error("Failed to collect diff: {0}")]
    DiffFailed(#[source] git2::Error),

    #[error("Failed to read current branch: {0}")]
    BranchLookup(#[source] git2::Error),

    #[error("Failed to stage changes: {0}")]
    StagingFailed(#[source] git2::Error),

    #[error("Failed to create commit: {0}")]
    CommitFailed(#[source] git2::Error),

    #[error("Failed to walk commit history: {0}")]
    LogFailed(#[source] git2::Error),
}

/// Errors from text-generation providers.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error(
        "{provider} authentication failed: {reason}. Set a key with 'aicommit config --provider {provider} --api-key <KEY>'"
    )]
    Authentication {
        provider: ProviderKind,
        reason: String,
    },

    #[error("{provider} API returned {status}: {message}")]
    Backend {
        provider: ProviderKind,
        status: u16,
        message: String,
    },

    #[error("{provider} did not respond within {secs} seconds")]
    Timeout { provider: ProviderKind, secs: u64 },

    #[error("{provider} returned an empty response")]
    EmptyResponse { provider: ProviderKind },

    #[error("Failed to reach {provider} API: {source}")]
    Transport {
        provider: ProviderKind,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned a response that could not be decoded: {detail}")]
    InvalidResponse {
        provider: ProviderKind,
        detail: String,
    },
}

impl ProviderError {
    /// The backend that produced this error.
    pub fn provider(&self) -> ProviderKind {
        match self {
            ProviderError::Authentication { provider, .. }
            | ProviderError::Backend { provider, .. }
            | ProviderError::Timeout { provider, .. }
            | ProviderError::EmptyResponse { provider }
            | ProviderError::Transport { provider, .. }
            | ProviderError::InvalidResponse { provider, .. } => *provider,
        }
    }
}

/// Errors from validating generated commit messages.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MessageError {
    #[error("Generated title '{title}' does not match the expected format {expected}")]
    InvalidFormat { title: String, expected: String },
}

/// Errors from settings and provider configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unsupported provider '{0}'. Use one of: qwen, openai, claude, deepseek")]
    UnsupportedProvider(String),

    #[error("Unsupported language '{0}'. Use one of: en, zh-CN, zh-TW")]
    UnsupportedLanguage(String),

    #[error("Temperature must be between 0 and 1, got {0}")]
    InvalidTemperature(f32),

    #[error("max_tokens must be greater than 0")]
    InvalidMaxTokens,

    #[error("Timeout must be at least one second")]
    InvalidTimeout,

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Could not determine the home directory for the config file")]
    NoHomeDirectory,

    #[error("Failed to write config file {}: {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize settings: {0}")]
    SerializeFailed(#[source] serde_json::Error),
}

/// Any error that can end a pipeline run.
///
/// Component errors pass through unchanged so callers can still match on them.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Message(#[from] MessageError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
