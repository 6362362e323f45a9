//! Work reports summarizing an author's commits over a date range.

use std::time::Duration;

use chrono::{Datelike, Days, NaiveDate};
use git2::Repository;
use tracing::info;

use crate::commit::pipeline::generate_with_timeout;
use crate::commit::prompt::build_report_prompt;
use crate::config::ProviderConfig;
use crate::error::{ConfigError, PipelineError};
use crate::git::{AuthorCommit, commits_by_author};
use crate::llm::CommitProvider;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Which dates a report covers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ReportPeriod {
    /// Monday through Sunday of the current week.
    #[default]
    ThisWeek,
    LastWeek,
    /// Explicit `YYYY-MM-DD` bounds; either may be missing.
    Between {
        since: Option<String>,
        until: Option<String>,
    },
}

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRange {
    pub since: NaiveDate,
    pub until: NaiveDate,
}

impl ReportRange {
    /// Move an open start (history's beginning) up to the oldest commit,
    /// so the report names a real date.
    pub fn starting_at_earliest(self, commits: &[AuthorCommit]) -> Self {
        match commits.iter().map(|c| c.date).min() {
            Some(earliest) if self.since < earliest && self.since == NaiveDate::MIN => Self {
                since: earliest,
                ..self
            },
            _ => self,
        }
    }
}

impl ReportPeriod {
    /// Resolve to concrete dates relative to `today`.
    ///
    /// With only `since`, the range ends today. With only `until`, it
    /// starts at the beginning of history. With neither, it is this week.
    pub fn resolve(&self, today: NaiveDate) -> Result<ReportRange, ConfigError> {
        let this_monday = week_start(today);
        match self {
            ReportPeriod::ThisWeek => Ok(week_of(this_monday)),
            ReportPeriod::LastWeek => {
                let last_monday = this_monday
                    .checked_sub_days(Days::new(7))
                    .unwrap_or(NaiveDate::MIN);
                Ok(week_of(last_monday))
            }
            ReportPeriod::Between { since, until } => {
                let since = since.as_deref().map(parse_date).transpose()?;
                let until = until.as_deref().map(parse_date).transpose()?;
                match (since, until) {
                    (None, None) => Ok(week_of(this_monday)),
                    (Some(since), None) => Ok(ReportRange {
                        since,
                        until: today,
                    }),
                    (since, Some(until)) => Ok(ReportRange {
                        since: since.unwrap_or(NaiveDate::MIN),
                        until,
                    }),
                }
            }
        }
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| ConfigError::InvalidDate(value.to_string()))
}

fn week_start(day: NaiveDate) -> NaiveDate {
    let offset = u64::from(day.weekday().num_days_from_monday());
    day.checked_sub_days(Days::new(offset)).unwrap_or(day)
}

fn week_of(monday: NaiveDate) -> ReportRange {
    ReportRange {
        since: monday,
        until: monday.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX),
    }
}

/// Commits that a report over `range` would cover.
pub fn report_commits(
    repo: &Repository,
    author_email: &str,
    range: ReportRange,
) -> Result<Vec<AuthorCommit>, PipelineError> {
    Ok(commits_by_author(repo, author_email, range.since, range.until)?)
}

/// Ask the provider for a Markdown report over `commits`.
///
/// The report prompt carries its own instructions, so no system
/// instruction is sent.
pub async fn generate_report<P: CommitProvider + ?Sized>(
    provider: &P,
    commits: &[AuthorCommit],
    range: ReportRange,
    config: &ProviderConfig,
    limit: Duration,
) -> Result<String, PipelineError> {
    let prompt = build_report_prompt(commits, range.since, range.until, config.language);
    info!(
        "Generating report for {} commit(s) with {} ({})",
        commits.len(),
        provider.kind(),
        config.model
    );
    Ok(generate_with_timeout(provider, &prompt, "", config, limit).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderKind;
    use crate::llm::provider::MockCommitProvider;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_this_week_runs_monday_to_sunday() {
        // 2024-03-06 is a Wednesday
        let range = ReportPeriod::ThisWeek.resolve(date("2024-03-06")).unwrap();
        assert_eq!(range.since, date("2024-03-04"));
        assert_eq!(range.until, date("2024-03-10"));

        // Sunday belongs to the week that started six days earlier
        let range = ReportPeriod::ThisWeek.resolve(date("2024-03-10")).unwrap();
        assert_eq!(range.since, date("2024-03-04"));
    }

    #[test]
    fn test_last_week() {
        let range = ReportPeriod::LastWeek.resolve(date("2024-03-04")).unwrap();
        assert_eq!(range.since, date("2024-02-26"));
        assert_eq!(range.until, date("2024-03-03"));
    }

    #[test]
    fn test_between_defaults() {
        let today = date("2024-03-06");

        let only_since = ReportPeriod::Between {
            since: Some("2024-01-15".to_string()),
            until: None,
        };
        assert_eq!(
            only_since.resolve(today).unwrap(),
            ReportRange {
                since: date("2024-01-15"),
                until: today
            }
        );

        let only_until = ReportPeriod::Between {
            since: None,
            until: Some("2024-02-01".to_string()),
        };
        assert_eq!(only_until.resolve(today).unwrap().since, NaiveDate::MIN);

        let neither = ReportPeriod::Between {
            since: None,
            until: None,
        };
        assert_eq!(
            neither.resolve(today).unwrap(),
            ReportPeriod::ThisWeek.resolve(today).unwrap()
        );
    }

    #[test]
    fn test_open_start_moves_to_earliest_commit() {
        let commits = vec![
            AuthorCommit {
                date: date("2024-02-20"),
                subject: "fix: b".to_string(),
            },
            AuthorCommit {
                date: date("2024-01-05"),
                subject: "feat: a".to_string(),
            },
        ];
        let open = ReportRange {
            since: NaiveDate::MIN,
            until: date("2024-03-01"),
        };
        assert_eq!(open.starting_at_earliest(&commits).since, date("2024-01-05"));

        let closed = ReportRange {
            since: date("2024-01-01"),
            until: date("2024-03-01"),
        };
        assert_eq!(closed.starting_at_earliest(&commits), closed);
    }

    #[test]
    fn test_invalid_dates_are_rejected() {
        for bad in ["2024/03/01", "yesterday", "2024-13-01", ""] {
            let period = ReportPeriod::Between {
                since: Some(bad.to_string()),
                until: None,
            };
            assert!(matches!(
                period.resolve(date("2024-03-06")),
                Err(ConfigError::InvalidDate(ref d)) if d == bad
            ));
        }
    }

    #[tokio::test]
    async fn test_generate_report_sends_no_system_instruction() {
        let mut mock = MockCommitProvider::new();
        mock.expect_kind().return_const(ProviderKind::Deepseek);
        mock.expect_generate()
            .withf(|prompt, system, _| {
                system.is_empty() && prompt.contains("- 2024-03-04 -- feat: add login")
            })
            .times(1)
            .returning(|_, _, _| Ok("# Weekly report".to_string()));

        let commits = vec![AuthorCommit {
            date: date("2024-03-04"),
            subject: "feat: add login".to_string(),
        }];
        let range = ReportPeriod::ThisWeek.resolve(date("2024-03-06")).unwrap();
        let config = ProviderConfig::with_defaults(ProviderKind::Deepseek, "k").unwrap();

        let report = generate_report(&mock, &commits, range, &config, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(report, "# Weekly report");
    }
}
