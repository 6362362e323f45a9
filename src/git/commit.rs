//! Writing commits and staging paths.

use std::path::Path;

use git2::{ErrorCode, Oid, Repository, Signature, Tree};
use tracing::{debug, info, warn};

use crate::error::GitError;

/// Full commit message: the title, then a blank line and the body if any.
pub fn format_commit_message(title: &str, body: Option<&str>) -> String {
    match body {
        Some(body) => format!("{title}\n\n{body}"),
        None => title.to_string(),
    }
}

/// Add `paths` to the index, or remove them from it when they no longer
/// exist in the working tree.
pub fn stage_paths(repo: &Repository, paths: &[String]) -> Result<(), GitError> {
    let workdir = repo.workdir().map(Path::to_path_buf);
    let mut index = repo.index().map_err(GitError::StagingFailed)?;

    for path in paths {
        let relative = Path::new(path);
        let exists = workdir
            .as_ref()
            .is_some_and(|dir| dir.join(relative).exists());

        if exists {
            index.add_path(relative).map_err(GitError::StagingFailed)?;
        } else {
            index.remove_path(relative).map_err(GitError::StagingFailed)?;
        }
    }

    index.write().map_err(GitError::StagingFailed)?;
    debug!("Staged {} path(s)", paths.len());
    Ok(())
}

/// Author and committer identity from git config (`user.name` / `user.email`).
pub fn committer_signature(repo: &Repository) -> Result<Signature<'static>, GitError> {
    repo.signature().map_err(GitError::CommitFailed)
}

/// Record the current index as a new commit on HEAD.
///
/// Nothing is staged here; the commit contains exactly what is in the
/// index. The first commit of an unborn branch has no parent.
pub fn apply_commit(repo: &Repository, title: &str, body: Option<&str>) -> Result<Oid, GitError> {
    let message = format_commit_message(title, body);

    let mut index = repo.index().map_err(GitError::CommitFailed)?;
    let tree_id = index.write_tree().map_err(GitError::CommitFailed)?;
    let tree = repo.find_tree(tree_id).map_err(GitError::CommitFailed)?;
    let sig = committer_signature(repo)?;

    let parent = match repo.head() {
        Ok(head) => Some(head.peel_to_commit().map_err(GitError::CommitFailed)?),
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => None,
        Err(e) => return Err(GitError::CommitFailed(e)),
    };
    let parents: Vec<_> = parent.iter().collect();

    let oid = repo
        .commit(Some("HEAD"), &sig, &sig, &message, &tree, &parents)
        .map_err(GitError::CommitFailed)?;

    info!("Created commit {oid}");
    Ok(oid)
}

/// Stage `paths` and commit them.
///
/// The index must match HEAD on entry. If staging or committing fails the
/// index is put back to HEAD, so a failed run leaves nothing staged.
pub fn commit_paths(
    repo: &Repository,
    paths: &[String],
    title: &str,
    body: Option<&str>,
) -> Result<Oid, GitError> {
    committer_signature(repo)?;

    let result = stage_paths(repo, paths).and_then(|()| apply_commit(repo, title, body));
    if result.is_err() {
        if let Err(e) = reset_index_to_head(repo) {
            warn!("Could not restore the index after a failed commit: {e}");
        }
    }
    result
}

/// Make the index match HEAD again (empty on an unborn branch).
fn reset_index_to_head(repo: &Repository) -> Result<(), GitError> {
    let mut index = repo.index().map_err(GitError::StagingFailed)?;
    match head_tree(repo)? {
        Some(tree) => index.read_tree(&tree).map_err(GitError::StagingFailed)?,
        None => index.clear().map_err(GitError::StagingFailed)?,
    }
    index.write().map_err(GitError::StagingFailed)
}

fn head_tree(repo: &Repository) -> Result<Option<Tree<'_>>, GitError> {
    match repo.head() {
        Ok(head) => Ok(Some(head.peel_to_tree().map_err(GitError::StagingFailed)?)),
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => Ok(None),
        Err(e) => Err(GitError::StagingFailed(e)),
    }
}
