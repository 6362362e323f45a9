//! aicommit - A CLI tool that drafts conventional commit messages with hosted LLMs.
//!
//! # Overview
//!
//! aicommit reads the staged (or unstaged) changes of a git repository, asks a
//! text-generation provider (Qwen, OpenAI, Claude or DeepSeek) for a commit
//! message, validates it against the conventional-commit grammar and, once the
//! user confirms, records the commit. It can also summarize an author's recent
//! commits into a Markdown work report.

pub mod commit;
pub mod config;
pub mod error;
pub mod git;
pub mod llm;

// Re-export commonly used types
pub use commit::{CommitMessage, CommitOutcome, ReportPeriod, ReportRange};
pub use config::{ConfigOverrides, Language, ProviderConfig, ProviderKind, Settings};
pub use error::{ConfigError, GitError, MessageError, PipelineError, ProviderError};
pub use git::{ChangeScope, ChangeSet};
pub use llm::{CommitProvider, create_provider};
