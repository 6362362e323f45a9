//! Commit-message generation: prompts, validation and the end-to-end flow.

pub mod message;
pub mod pipeline;
pub mod prompt;
pub mod report;
pub mod types;

pub use message::{CommitMessage, parse, title_pattern};
pub use pipeline::{
    CommitOutcome, DEFAULT_TIMEOUT_SECS, TIMEOUT_ENV_VAR, check_provider, commit_literal,
    draft_commit_message, generate_and_commit, generate_with_timeout, generation_timeout,
};
pub use prompt::{build_prompt, build_report_prompt, system_instruction};
pub use report::{ReportPeriod, ReportRange, generate_report, parse_date, report_commits};
pub use types::{CommitType, commit_types, default_allowed_types};
