//! Change-set collection from the index or working tree using git2.

use std::fmt;

use git2::{Diff, DiffFormat, ErrorCode, Repository, Tree};
use tracing::debug;

use crate::error::GitError;
use crate::git::repository::current_branch;

/// Which comparison to summarize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChangeScope {
    /// Index against HEAD (`git diff --cached`).
    #[default]
    Staged,
    /// Working tree against the index (`git diff`).
    Unstaged,
}

impl ChangeScope {
    /// What the user can do about an empty change-set.
    pub fn hint(&self) -> &'static str {
        match self {
            ChangeScope::Staged => "Use 'git add' to stage your changes.",
            ChangeScope::Unstaged => "The working tree matches the index.",
        }
    }
}

impl fmt::Display for ChangeScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeScope::Staged => write!(f, "staged"),
            ChangeScope::Unstaged => write!(f, "unstaged"),
        }
    }
}

/// The files, diff text and branch selected for summarization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    files_changed: Vec<String>,
    diff_content: String,
    branch_name: String,
}

impl ChangeSet {
    pub fn new(
        files_changed: Vec<String>,
        diff_content: impl Into<String>,
        branch_name: impl Into<String>,
    ) -> Self {
        Self {
            files_changed,
            diff_content: diff_content.into(),
            branch_name: branch_name.into(),
        }
    }

    /// Paths touched by the diff, in diff order.
    pub fn files_changed(&self) -> &[String] {
        &self.files_changed
    }

    /// Unified diff text for the same comparison.
    pub fn diff_content(&self) -> &str {
        &self.diff_content
    }

    pub fn branch_name(&self) -> &str {
        &self.branch_name
    }
}

/// Resolve the HEAD tree, distinguishing empty-repo errors from real failures.
///
/// Returns `Ok(None)` for repos with no commits (unborn branch / not found),
/// `Ok(Some(tree))` for repos with a valid HEAD, or `Err(GitError::DiffFailed)`
/// for real errors (corrupt HEAD, permission issues, missing objects).
fn resolve_head_tree(repo: &Repository) -> Result<Option<Tree<'_>>, GitError> {
    let head_ref = match repo.head() {
        Ok(r) => r,
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            return Ok(None);
        }
        Err(e) => return Err(GitError::DiffFailed(e)),
    };

    let tree = head_ref.peel_to_tree().map_err(GitError::DiffFailed)?;
    Ok(Some(tree))
}

/// Collect the change-set for `scope`.
///
/// Read-only: neither the index nor the working tree is modified. Fails with
/// [`GitError::NoChanges`] when the selected comparison is empty.
pub fn collect_changes(repo: &Repository, scope: ChangeScope) -> Result<ChangeSet, GitError> {
    let diff = match scope {
        ChangeScope::Staged => {
            let head_tree = resolve_head_tree(repo)?;
            repo.diff_tree_to_index(head_tree.as_ref(), None, None)
                .map_err(GitError::DiffFailed)?
        }
        ChangeScope::Unstaged => repo
            .diff_index_to_workdir(None, None)
            .map_err(GitError::DiffFailed)?,
    };

    let files_changed = changed_paths(&diff);
    if files_changed.is_empty() {
        return Err(GitError::NoChanges { scope });
    }

    let diff_content = unified_diff_text(&diff)?;
    let branch_name = current_branch(repo)?;

    debug!(
        "Collected {} {} file(s), {} bytes of diff on {}",
        files_changed.len(),
        scope,
        diff_content.len(),
        branch_name
    );

    Ok(ChangeSet {
        files_changed,
        diff_content,
        branch_name,
    })
}

/// Paths whose index entry differs from HEAD. Empty when nothing is staged.
pub fn staged_paths(repo: &Repository) -> Result<Vec<String>, GitError> {
    let head_tree = resolve_head_tree(repo)?;
    let diff = repo
        .diff_tree_to_index(head_tree.as_ref(), None, None)
        .map_err(GitError::DiffFailed)?;
    Ok(changed_paths(&diff))
}

/// Paths touched by a diff, in the order the diff enumerates them.
fn changed_paths(diff: &Diff<'_>) -> Vec<String> {
    diff.deltas()
        .filter_map(|delta| {
            delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .map(|p| p.to_string_lossy().to_string())
        })
        .filter(|path| !path.is_empty())
        .collect()
}

/// Render a diff as unified patch text.
fn unified_diff_text(diff: &Diff<'_>) -> Result<String, GitError> {
    let mut text = String::new();

    diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        // Content lines carry their origin marker separately from the text.
        let origin = line.origin();
        if origin == '+' || origin == '-' || origin == ' ' {
            text.push(origin);
        }
        text.push_str(&String::from_utf8_lossy(line.content()));
        true
    })
    .map_err(GitError::DiffFailed)?;

    Ok(text)
}
