//! End-to-end commit flow: collect, prompt, generate, validate, apply.
//!
//! Nothing here retries. A failed generation or a rejected message ends the
//! run before the repository is touched.

use std::collections::BTreeSet;
use std::env;
use std::time::{Duration, Instant};

use git2::{Oid, Repository};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::commit::message::{CommitMessage, parse};
use crate::commit::prompt::{build_prompt, system_instruction};
use crate::config::ProviderConfig;
use crate::error::{ConfigError, GitError, PipelineError, ProviderError};
use crate::git::{
    ChangeScope, ChangeSet, apply_commit, collect_changes, commit_paths, staged_paths,
};
use crate::llm::CommitProvider;

/// Default bound on a single generation call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Environment variable to override the default timeout.
pub const TIMEOUT_ENV_VAR: &str = "AICOMMIT_TIMEOUT";

/// Resolve the generation timeout.
///
/// An explicit value wins and must be at least one second. Otherwise
/// `AICOMMIT_TIMEOUT` is used when it holds a positive number of seconds;
/// anything else there falls back to the default with a warning.
pub fn generation_timeout(explicit_secs: Option<u64>) -> Result<Duration, ConfigError> {
    if let Some(secs) = explicit_secs {
        if secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        return Ok(Duration::from_secs(secs));
    }

    match env::var(TIMEOUT_ENV_VAR) {
        Ok(v) if !v.is_empty() => match v.parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
            _ => {
                warn!(
                    "Invalid {} value '{}', using default {}s",
                    TIMEOUT_ENV_VAR, v, DEFAULT_TIMEOUT_SECS
                );
                Ok(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            }
        },
        _ => Ok(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
    }
}

/// Run one provider call, giving up after `limit`.
///
/// The in-flight request is dropped on expiry.
pub async fn generate_with_timeout<P: CommitProvider + ?Sized>(
    provider: &P,
    prompt: &str,
    system_instruction: &str,
    config: &ProviderConfig,
    limit: Duration,
) -> Result<String, ProviderError> {
    match timeout(limit, provider.generate(prompt, system_instruction, config)).await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::Timeout {
            provider: provider.kind(),
            secs: limit.as_secs(),
        }),
    }
}

/// Ask the provider for a message describing `changes` and validate it.
pub async fn draft_commit_message<P: CommitProvider + ?Sized>(
    provider: &P,
    changes: &ChangeSet,
    config: &ProviderConfig,
    allowed_types: &BTreeSet<String>,
    limit: Duration,
) -> Result<CommitMessage, PipelineError> {
    let prompt = build_prompt(changes);
    let instruction = system_instruction(config.language);

    info!(
        "Generating commit message with {} ({})",
        provider.kind(),
        config.model
    );
    debug!("Prompt is {} chars", prompt.len());

    let raw = generate_with_timeout(provider, &prompt, &instruction, config, limit).await?;
    let message = parse(&raw, allowed_types)?;
    Ok(message)
}

/// What happened at the end of an interactive run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed { oid: Oid, message: CommitMessage },
    /// The user declined; the repository is untouched.
    Declined { message: CommitMessage },
}

/// Generate a message for `scope`, ask `confirm`, and commit on approval.
///
/// For the unstaged scope the summarized files are staged only after
/// approval, so the commit records what the message describes. That scope
/// is refused up front when the index already differs from HEAD, since
/// those staged changes would land in a commit the message never covered.
pub async fn generate_and_commit<P, F>(
    repo: &Repository,
    scope: ChangeScope,
    provider: &P,
    config: &ProviderConfig,
    allowed_types: &BTreeSet<String>,
    limit: Duration,
    confirm: F,
) -> Result<CommitOutcome, PipelineError>
where
    P: CommitProvider + ?Sized,
    F: FnOnce(&CommitMessage) -> bool,
{
    let changes = collect_changes(repo, scope)?;
    if scope == ChangeScope::Unstaged {
        let already_staged = staged_paths(repo)?;
        if !already_staged.is_empty() {
            return Err(GitError::StagedChangesPresent {
                paths: already_staged,
            }
            .into());
        }
    }

    let message = draft_commit_message(provider, &changes, config, allowed_types, limit).await?;

    if !confirm(&message) {
        info!("Commit declined");
        return Ok(CommitOutcome::Declined { message });
    }

    let oid = match scope {
        ChangeScope::Staged => apply_commit(repo, &message.title, message.body.as_deref())?,
        ChangeScope::Unstaged => commit_paths(
            repo,
            changes.files_changed(),
            &message.title,
            message.body.as_deref(),
        )?,
    };
    Ok(CommitOutcome::Committed { oid, message })
}

/// Commit the staged changes with `text` as the message, skipping
/// generation and validation.
pub fn commit_literal(repo: &Repository, text: &str) -> Result<Oid, PipelineError> {
    collect_changes(repo, ChangeScope::Staged)?;
    let message = CommitMessage::literal(text);
    let oid = apply_commit(repo, &message.title, message.body.as_deref())?;
    Ok(oid)
}

/// Send a minimal request and report how long it took.
pub async fn check_provider<P: CommitProvider + ?Sized>(
    provider: &P,
    config: &ProviderConfig,
    limit: Duration,
) -> Result<Duration, ProviderError> {
    let mut probe = config.clone();
    probe.max_tokens = 5;

    let started = Instant::now();
    generate_with_timeout(provider, "Hi", "", &probe, limit).await?;
    Ok(started.elapsed())
}
