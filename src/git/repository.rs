//! Repository discovery and branch lookup.

use std::env;
use std::path::{Path, PathBuf};

use git2::{ErrorCode, Repository};
use tracing::debug;

use crate::error::GitError;

/// Branch name reported when HEAD does not point at a branch.
pub const DETACHED_HEAD: &str = "HEAD-detached";

/// Find the repository containing the current directory.
///
/// Returns the repository handle and its working directory.
pub fn locate_repository() -> Result<(Repository, PathBuf), GitError> {
    let cwd = env::current_dir().map_err(|e| GitError::NotARepository {
        path: PathBuf::from("."),
        source: git2::Error::from_str(&format!("cannot read current directory: {e}")),
    })?;
    locate_repository_from(&cwd)
}

/// Find the repository containing `start`, searching parent directories.
pub fn locate_repository_from(start: &Path) -> Result<(Repository, PathBuf), GitError> {
    let repo = Repository::discover(start).map_err(|source| GitError::NotARepository {
        path: start.to_path_buf(),
        source,
    })?;

    let workdir = repo
        .workdir()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| repo.path().to_path_buf());

    debug!("Using repository at {}", workdir.display());
    Ok((repo, workdir))
}

/// Name of the branch HEAD points at.
///
/// A freshly initialised repository reports the unborn branch name; a
/// detached HEAD reports [`DETACHED_HEAD`].
pub fn current_branch(repo: &Repository) -> Result<String, GitError> {
    match repo.head() {
        Ok(head) if head.is_branch() => Ok(head
            .shorthand()
            .map(str::to_string)
            .unwrap_or_else(|| DETACHED_HEAD.to_string())),
        Ok(_) => Ok(DETACHED_HEAD.to_string()),
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            unborn_branch_name(repo)
        }
        Err(e) => Err(GitError::BranchLookup(e)),
    }
}

/// Read the branch HEAD symbolically targets before the first commit.
fn unborn_branch_name(repo: &Repository) -> Result<String, GitError> {
    let head = repo.find_reference("HEAD").map_err(GitError::BranchLookup)?;
    let name = head
        .symbolic_target()
        .map(|target| target.strip_prefix("refs/heads/").unwrap_or(target))
        .unwrap_or(DETACHED_HEAD);
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::Signature;

    fn init_with_commit() -> (tempfile::TempDir, Repository) {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        {
            let sig = Signature::now("Test", "test@test.com").unwrap();
            let tree_id = repo.index().unwrap().write_tree().unwrap();
            let tree = repo.find_tree(tree_id).unwrap();
            repo.commit(Some("HEAD"), &sig, &sig, "init", &tree, &[])
                .unwrap();
        }
        (dir, repo)
    }

    #[test]
    fn test_locate_repository_from_subdirectory() {
        let (dir, _repo) = init_with_commit();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let (_found, workdir) = locate_repository_from(&nested).unwrap();
        assert_eq!(
            workdir.canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_locate_repository_outside_repo_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = locate_repository_from(dir.path());
        assert!(matches!(result, Err(GitError::NotARepository { .. })));
    }

    #[test]
    fn test_current_branch_on_named_branch() {
        let (_dir, repo) = init_with_commit();
        let head = repo.head().unwrap().peel_to_commit().unwrap();
        repo.branch("feature/login", &head, false).unwrap();
        repo.set_head("refs/heads/feature/login").unwrap();

        assert_eq!(current_branch(&repo).unwrap(), "feature/login");
    }

    #[test]
    fn test_current_branch_is_stable() {
        let (_dir, repo) = init_with_commit();
        let first = current_branch(&repo).unwrap();
        let second = current_branch(&repo).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_current_branch_detached() {
        let (_dir, repo) = init_with_commit();
        let oid = repo.head().unwrap().target().unwrap();
        repo.set_head_detached(oid).unwrap();

        assert_eq!(current_branch(&repo).unwrap(), DETACHED_HEAD);
    }

    #[test]
    fn test_current_branch_unborn() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        repo.set_head("refs/heads/trunk").unwrap();

        assert_eq!(current_branch(&repo).unwrap(), "trunk");
    }
}
