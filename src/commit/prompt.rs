//! Prompt construction for generated commit messages and work reports.

use chrono::NaiveDate;

use crate::commit::types::commit_types;
use crate::config::Language;
use crate::git::{AuthorCommit, ChangeSet};

/// Build the per-request prompt for a change-set.
///
/// The diff is passed through verbatim; no sanitizing or truncation.
pub fn build_prompt(changes: &ChangeSet) -> String {
    let files_section = changes
        .files_changed()
        .iter()
        .map(|file| format!("- {file}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Generate a concise and descriptive git commit message for the following changes:

Branch: {branch}

Files changed:
{files_section}

Changes:
{diff}

Format the response as:
<title>: Brief description (max 50 chars)
<body>: Detailed explanation if needed (optional)

Focus on the purpose and impact of the changes."#,
        branch = changes.branch_name(),
        diff = changes.diff_content(),
    )
}

/// Fixed instruction describing the required output grammar, with one
/// worked example.
pub fn system_instruction(language: Language) -> String {
    let type_list: String = commit_types(language)
        .iter()
        .map(|t| format!("- {}: {}\n", t.name, t.description))
        .collect();

    match language {
        Language::En => format!(
            r#"You are a helpful assistant that generates standardized git commit messages.
Follow these strict rules for commit message format:

1. Format: <type>(<scope>): <subject>

<body>

<footer>

2. Types must be one of:
{type_list}
3. Scope: Optional, describes the affected area (e.g., router, auth, db)
4. Subject: Short summary (50 chars or less)
5. Body: Detailed explanation (72 chars per line)
6. Footer: Optional, for breaking changes or issue references

Example:
feat(auth): implement JWT authentication

Add JWT-based authentication system with refresh tokens
- Implement token generation and validation
- Add user session management
- Set up secure cookie handling

BREAKING CHANGE: New authentication headers required"#
        ),
        Language::ZhCn => format!(
            r#"您是一个帮助生成标准化git提交信息的助手。
请严格遵循以下提交信息格式规则：

1. 格式：<类型>(<范围>): <主题>

<正文>

<脚注>

2. 类型必须是以下之一：
{type_list}
3. 范围：可选，描述影响的区域（如：router、auth、db）
4. 主题：简短摘要（不超过50个字符）
5. 正文：详细说明（每行不超过72个字符）
6. 脚注：可选，用于说明重大变更

类型必须使用上面列出的英文关键字。

示例：
feat(auth): 实现JWT认证系统

添加基于JWT的认证系统，支持刷新令牌
- 实现令牌生成和验证
- 添加用户会话管理
- 设置安全Cookie处理

重大变更：需要新的认证头"#
        ),
        Language::ZhTw => format!(
            r#"您是一個幫助生成標準化git提交信息的助手。
請嚴格遵循以下提交信息格式規則：

1. 格式：<類型>(<範圍>): <主題>

<正文>

<腳註>

2. 類型必須是以下之一：
{type_list}
3. 範圍：可選，描述影響的區域（如：router、auth、db）
4. 主題：簡短摘要（不超過50個字符）
5. 正文：詳細說明（每行不超過72個字符）
6. 腳註：可選，用於說明重大變更

類型必須使用上面列出的英文關鍵字。

示例：
feat(auth): 實現JWT認證系統

添加基於JWT的認證系統，支持刷新令牌
- 實現令牌生成和驗證
- 添加用戶會話管理
- 設置安全Cookie處理

重大變更：需要新的認證頭"#
        ),
    }
}

/// Build the work-report prompt for commits in `since..=until`.
///
/// Sent without a system instruction.
pub fn build_report_prompt(
    commits: &[AuthorCommit],
    since: NaiveDate,
    until: NaiveDate,
    language: Language,
) -> String {
    let commit_list = commits
        .iter()
        .map(|c| format!("- {}", c.format_line()))
        .collect::<Vec<_>>()
        .join("\n");
    let since = since.format("%Y-%m-%d");
    let until = until.format("%Y-%m-%d");

    match language {
        Language::En => format!(
            r#"Please summarize the following Git commit records (formatted as "- YYYY-MM-DD -- Commit Subject") into a concise work report for the period {since} to {until}.

Requirements:
1.  Use Markdown format.
2.  Summarize the main work completed **per day**. **Do not** list individual commit messages.
3.  Ignore any commits related to "Merge branch" or "Merge remote-tracking branch".
4.  The report title or beginning should clearly state the reporting period is from {since} to {until}.
5.  The language should be English.

Commit Records:
{commit_list}

Please generate the report content:"#
        ),
        Language::ZhCn => format!(
            r#"请根据以下 Git commit 记录（格式为 "- YYYY-MM-DD -- Commit Subject"），为日期范围 {since} 至 {until} 总结生成一份简洁的工作日报。

要求：
1.  使用 Markdown 格式。
2.  按日期**总结**当天完成的主要工作，**不要**罗列单个 commit message。
3.  忽略所有 "Merge branch" 或 "Merge remote-tracking branch" 相关的提交。
4.  报告标题或开头应明确指出报告的时间范围是 {since} 到 {until}。
5.  语言为简体中文。

Commit 记录:
{commit_list}

请生成日报内容："#
        ),
        Language::ZhTw => format!(
            r#"請根據以下 Git commit 記錄（格式為 "- YYYY-MM-DD -- Commit Subject"），為日期範圍 {since} 至 {until} 總結生成一份簡潔的工作日報。

要求：
1.  使用 Markdown 格式。
2.  按日期**總結**當天完成的主要工作，**不要**羅列單個 commit message。
3.  忽略所有 "Merge branch" 或 "Merge remote-tracking branch" 相關的提交。
4.  報告標題或開頭應明確指出報告的時間範圍是 {since} 到 {until}。
5.  語言為繁體中文。

Commit 記錄:
{commit_list}

請生成日報內容："#
        ),
    }
}
