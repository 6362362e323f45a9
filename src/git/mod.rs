//! Git operations using git2-rs.

pub mod changes;
pub mod commit;
pub mod log;
pub mod repository;

pub use changes::{ChangeScope, ChangeSet, collect_changes, staged_paths};
pub use commit::{
    apply_commit, commit_paths, committer_signature, format_commit_message, stage_paths,
};
pub use log::{AuthorCommit, commits_by_author, user_email};
pub use repository::{DETACHED_HEAD, current_branch, locate_repository, locate_repository_from};
