//! Author history for work reports.

use chrono::{DateTime, FixedOffset, NaiveDate};
use git2::{ErrorCode, Repository, Sort};
use tracing::debug;

use crate::error::GitError;

const MERGE_PREFIXES: &[&str] = &["Merge branch", "Merge remote-tracking branch"];

/// One commit in a report, dated by its committer time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorCommit {
    pub date: NaiveDate,
    pub subject: String,
}

impl AuthorCommit {
    /// `YYYY-MM-DD -- subject`
    pub fn format_line(&self) -> String {
        format!("{} -- {}", self.date.format("%Y-%m-%d"), self.subject)
    }
}

/// `user.email` from git config, if configured.
pub fn user_email(repo: &Repository) -> Option<String> {
    repo.config()
        .ok()?
        .get_string("user.email")
        .ok()
        .filter(|email| !email.trim().is_empty())
}

/// Commits reachable from HEAD authored by `email` and committed between
/// `since` and `until` inclusive, newest first. Merge commits are skipped.
pub fn commits_by_author(
    repo: &Repository,
    email: &str,
    since: NaiveDate,
    until: NaiveDate,
) -> Result<Vec<AuthorCommit>, GitError> {
    // push_head reports an unborn branch as a generic error, so ask HEAD first
    match repo.head() {
        Ok(_) => {}
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            debug!("HEAD has no commits yet");
            return Ok(Vec::new());
        }
        Err(e) => return Err(GitError::LogFailed(e)),
    }

    let mut revwalk = repo.revwalk().map_err(GitError::LogFailed)?;
    revwalk
        .set_sorting(Sort::TIME)
        .map_err(GitError::LogFailed)?;
    revwalk.push_head().map_err(GitError::LogFailed)?;

    let mut commits = Vec::new();
    for oid in revwalk {
        let oid = oid.map_err(GitError::LogFailed)?;
        let commit = repo.find_commit(oid).map_err(GitError::LogFailed)?;

        let author = commit.author();
        let matches_author = author
            .email()
            .is_some_and(|e| e.eq_ignore_ascii_case(email));
        if !matches_author {
            continue;
        }

        let Some(date) = commit_date(&commit.time()) else {
            continue;
        };
        if date < since || date > until {
            continue;
        }

        let subject = commit.summary().unwrap_or_default().trim().to_string();
        if MERGE_PREFIXES.iter().any(|p| subject.starts_with(p)) {
            continue;
        }

        commits.push(AuthorCommit { date, subject });
    }

    debug!(
        "Found {} commit(s) by {email} between {since} and {until}",
        commits.len()
    );
    Ok(commits)
}

/// Calendar date of a git timestamp in its own recorded offset.
fn commit_date(time: &git2::Time) -> Option<NaiveDate> {
    let offset = FixedOffset::east_opt(time.offset_minutes() * 60)?;
    let utc = DateTime::from_timestamp(time.seconds(), 0)?;
    Some(utc.with_timezone(&offset).date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{Signature, Time};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn timestamp(day: &str) -> i64 {
        date(day).and_hms_opt(12, 0, 0).unwrap().and_utc().timestamp()
    }

    fn commit_as(repo: &Repository, email: &str, day: &str, message: &str) {
        let sig = Signature::new("Someone", email, &Time::new(timestamp(day), 0)).unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<_> = parent.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap();
    }

    #[test]
    fn test_commits_by_author_filters_range_author_and_merges() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();

        commit_as(&repo, "me@example.com", "2024-03-03", "chore: before range");
        commit_as(&repo, "me@example.com", "2024-03-04", "feat: first\n\nbody");
        commit_as(&repo, "other@example.com", "2024-03-05", "fix: not mine");
        commit_as(&repo, "me@example.com", "2024-03-06", "Merge branch 'dev'");
        commit_as(&repo, "ME@example.com", "2024-03-10", "docs: last day");
        commit_as(&repo, "me@example.com", "2024-03-11", "test: after range");

        let commits =
            commits_by_author(&repo, "me@example.com", date("2024-03-04"), date("2024-03-10"))
                .unwrap();
        let lines: Vec<_> = commits.iter().map(AuthorCommit::format_line).collect();
        assert_eq!(
            lines,
            ["2024-03-10 -- docs: last day", "2024-03-04 -- feat: first"]
        );
    }

    #[test]
    fn test_commits_by_author_on_empty_repo() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let commits =
            commits_by_author(&repo, "me@example.com", date("2024-01-01"), date("2024-12-31"))
                .unwrap();
        assert!(commits.is_empty());
    }

    #[test]
    fn test_user_email_reads_repo_config() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        repo.config()
            .unwrap()
            .set_str("user.email", "dev@example.com")
            .unwrap();
        assert_eq!(user_email(&repo).as_deref(), Some("dev@example.com"));
    }

    #[test]
    fn test_commit_date_uses_recorded_offset() {
        // 23:30 UTC is already the next day at +02:00
        let secs = date("2024-03-04")
            .and_hms_opt(23, 30, 0)
            .unwrap()
            .and_utc()
            .timestamp();
        assert_eq!(commit_date(&Time::new(secs, 0)), Some(date("2024-03-04")));
        assert_eq!(commit_date(&Time::new(secs, 120)), Some(date("2024-03-05")));
    }
}
