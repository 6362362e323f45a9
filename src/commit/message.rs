//! Parsing and validation of generated commit messages.

use std::collections::BTreeSet;
use std::fmt;

use regex_lite::Regex;

use crate::error::MessageError;
use crate::git::format_commit_message;

/// A validated commit message ready to be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMessage {
    pub title: String,
    /// Absent rather than empty when there is nothing after the title.
    pub body: Option<String>,
}

impl CommitMessage {
    /// A user-supplied message, taken verbatim without grammar checks.
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            title: text.into(),
            body: None,
        }
    }

    /// Full message text as it will be recorded.
    pub fn format(&self) -> String {
        format_commit_message(&self.title, self.body.as_deref())
    }
}

impl fmt::Display for CommitMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

/// Title pattern for a set of allowed types: `^(type)(\(scope\))?: .+`.
pub fn title_pattern(allowed_types: &BTreeSet<String>) -> String {
    let alternatives = allowed_types
        .iter()
        .map(|t| regex_lite::escape(t))
        .collect::<Vec<_>>()
        .join("|");
    format!(r"^({alternatives})(\([^)]+\))?: .+")
}

/// Split raw generated text into a title and optional body, rejecting
/// titles that do not follow `type(scope): subject`.
///
/// The first non-empty line is the title; everything after it, trimmed,
/// is the body. Types are matched case-sensitively.
pub fn parse(raw: &str, allowed_types: &BTreeSet<String>) -> Result<CommitMessage, MessageError> {
    let mut lines = raw.lines();
    let title = lines
        .by_ref()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string();

    let body = lines.collect::<Vec<_>>().join("\n").trim().to_string();
    let body = (!body.is_empty()).then_some(body);

    let expected = title_pattern(allowed_types);
    let invalid = || MessageError::InvalidFormat {
        title: title.clone(),
        expected: expected.clone(),
    };

    if allowed_types.is_empty() {
        return Err(invalid());
    }
    let re = Regex::new(&expected).map_err(|_| invalid())?;
    if !re.is_match(&title) {
        return Err(invalid());
    }

    Ok(CommitMessage { title, body })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commit::types::default_allowed_types;

    fn types(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_title_only() {
        let msg = parse("feat(auth): add login", &default_allowed_types()).unwrap();
        assert_eq!(msg.title, "feat(auth): add login");
        assert_eq!(msg.body, None);
    }

    #[test]
    fn test_parse_title_and_body() {
        let raw = "feat(docs): update readme\n\nExplain install steps";
        let msg = parse(raw, &default_allowed_types()).unwrap();
        assert_eq!(msg.title, "feat(docs): update readme");
        assert_eq!(msg.body.as_deref(), Some("Explain install steps"));
        assert_eq!(msg.format(), raw);
    }

    #[test]
    fn test_parse_skips_leading_blank_lines() {
        let raw = "\n\n  fix: handle empty input  \n\n  line one\nline two\n\n";
        let msg = parse(raw, &default_allowed_types()).unwrap();
        assert_eq!(msg.title, "fix: handle empty input");
        assert_eq!(msg.body.as_deref(), Some("line one\nline two"));
    }

    #[test]
    fn test_parse_whitespace_only_body_is_absent() {
        let msg = parse("chore: bump deps\n   \n\t\n", &default_allowed_types()).unwrap();
        assert_eq!(msg.body, None);
    }

    #[test]
    fn test_parse_every_allowed_type_with_scope() {
        let allowed = types(&["feat", "fix", "build", "ci"]);
        for t in &allowed {
            for title in [format!("{t}: subject"), format!("{t}(core-api): subject")] {
                let msg = parse(&title, &allowed).unwrap();
                assert_eq!(msg.title, title);
                assert!(msg.body.is_none());
            }
        }
    }

    #[test]
    fn test_parse_rejects_missing_type() {
        let err = parse("updated stuff", &default_allowed_types()).unwrap_err();
        let MessageError::InvalidFormat { title, expected } = err;
        assert_eq!(title, "updated stuff");
        assert_eq!(expected, title_pattern(&default_allowed_types()));
    }

    #[test]
    fn test_parse_rejects_malformed_titles() {
        let allowed = default_allowed_types();
        for raw in [
            "",
            "\n\n",
            "Feat: capitalized type",
            "feature: not a type",
            "feat:no space",
            "feat: ",
            "feat(): empty scope",
            "feat(scope) : space before colon",
            "perf: not in the default set",
            "xfeat: prefix",
        ] {
            assert!(
                matches!(parse(raw, &allowed), Err(MessageError::InvalidFormat { .. })),
                "expected rejection for {raw:?}"
            );
        }
    }

    #[test]
    fn test_parse_only_checks_first_non_empty_line() {
        let err = parse("not valid\nfeat: valid later", &default_allowed_types()).unwrap_err();
        assert!(matches!(err, MessageError::InvalidFormat { ref title, .. } if title == "not valid"));
    }

    #[test]
    fn test_parse_with_empty_type_set_rejects_everything() {
        assert!(parse("feat: x", &BTreeSet::new()).is_err());
        assert!(parse(": x", &BTreeSet::new()).is_err());
    }

    #[test]
    fn test_parse_escapes_type_names() {
        let allowed = types(&["a.b"]);
        assert!(parse("a.b: ok", &allowed).is_ok());
        assert!(parse("axb: nope", &allowed).is_err());
    }

    #[test]
    fn test_literal_message_is_verbatim() {
        let msg = CommitMessage::literal("wip");
        assert_eq!(msg.format(), "wip");
        assert!(msg.body.is_none());
    }
}
