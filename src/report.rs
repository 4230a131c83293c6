use indexmap::IndexMap;
use serde::Serialize;

use crate::issue::Issue;

/// All of one file's errors, in the order they were found.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct FileReport {
    pub file: String,
    pub errors: Vec<String>,
}

/// Group issues by originating file. Files come out in first-seen order
/// and each file's errors keep their relative order, so reports are
/// stable run to run.
pub fn group_issues_by_file(issues: &[Issue]) -> Vec<FileReport> {
    let mut groups: IndexMap<&str, Vec<String>> = IndexMap::new();
    for issue in issues {
        groups
            .entry(issue.file.as_str())
            .or_default()
            .push(issue.message.clone());
    }

    groups
        .into_iter()
        .map(|(file, errors)| FileReport {
            file: file.to_string(),
            errors,
        })
        .collect()
}

/// Machine-readable report envelope. Carries the pass/fail verdict and
/// the issue count so CI consumers do not have to infer them from exit
/// codes or error strings.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct JsonReport {
    pub ok: bool,
    pub issue_count: usize,
    pub files: Vec<FileReport>,
}

pub fn json_report(issues: &[Issue]) -> JsonReport {
    JsonReport {
        ok: issues.is_empty(),
        issue_count: issues.len(),
        files: group_issues_by_file(issues),
    }
}
