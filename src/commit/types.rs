//! Conventional-commit type vocabulary.

use std::collections::BTreeSet;

use crate::config::Language;

/// A commit type and what it is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitType {
    pub name: &'static str,
    pub description: &'static str,
}

const fn ty(name: &'static str, description: &'static str) -> CommitType {
    CommitType { name, description }
}

const EN: [CommitType; 7] = [
    ty("feat", "New feature"),
    ty("fix", "Bug fix"),
    ty("refactor", "Code refactoring"),
    ty("docs", "Documentation changes"),
    ty("style", "Code style changes (formatting, missing semicolons, etc)"),
    ty("test", "Adding or modifying tests"),
    ty("chore", "Maintenance tasks, dependencies, build changes"),
];

const ZH_CN: [CommitType; 7] = [
    ty("feat", "新功能"),
    ty("fix", "修复缺陷"),
    ty("refactor", "代码重构"),
    ty("docs", "文档更新"),
    ty("style", "代码格式"),
    ty("test", "测试相关"),
    ty("chore", "其他更新"),
];

const ZH_TW: [CommitType; 7] = [
    ty("feat", "新功能"),
    ty("fix", "修復缺陷"),
    ty("refactor", "代碼重構"),
    ty("docs", "文檔更新"),
    ty("style", "代碼格式"),
    ty("test", "測試相關"),
    ty("chore", "其他更新"),
];

/// The seven default types with descriptions in `language`.
///
/// Descriptions only feed the system instruction; validation uses names.
pub fn commit_types(language: Language) -> &'static [CommitType] {
    match language {
        Language::En => &EN,
        Language::ZhCn => &ZH_CN,
        Language::ZhTw => &ZH_TW,
    }
}

/// Type names accepted by the parser when the caller does not narrow them.
pub fn default_allowed_types() -> BTreeSet<String> {
    EN.iter().map(|t| t.name.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_allowed_types() {
        let types = default_allowed_types();
        let names: Vec<_> = types.iter().map(String::as_str).collect();
        assert_eq!(
            names,
            ["chore", "docs", "feat", "fix", "refactor", "style", "test"]
        );
    }

    #[test]
    fn test_localized_tables_share_names() {
        for language in [Language::ZhCn, Language::ZhTw] {
            let names: Vec<_> = commit_types(language).iter().map(|t| t.name).collect();
            let en: Vec<_> = commit_types(Language::En).iter().map(|t| t.name).collect();
            assert_eq!(names, en);
        }
    }
}
