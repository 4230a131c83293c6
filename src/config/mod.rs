use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_yaml::Value;
use thiserror::Error;

use crate::issue::Issue;

/// The two kinds of config file a repo can hold. Files of the same kind
/// across environments form one comparison group; variables are never
/// compared against secrets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Variables,
    Secrets,
}

impl FileKind {
    pub fn of(file_name: &str) -> Option<FileKind> {
        if file_name.ends_with("variables.yaml") {
            Some(FileKind::Variables)
        } else if file_name.ends_with("secrets.yaml") {
            Some(FileKind::Secrets)
        } else {
            None
        }
    }
}

/// A single parsed config file.
///
/// `tree` is the generic YAML value; mapping order is insertion order,
/// which validation traversal relies on. `source` keeps the raw text so
/// the contents scanner can recover line numbers and comments that the
/// decoded tree has lost.
#[derive(Debug)]
pub struct ConfigDocument {
    /// Path relative to the repo root, e.g. "prod/variables.yaml".
    pub file: String,
    pub tree: Value,
    pub source: String,
}

impl ConfigDocument {
    pub fn kind(&self) -> Option<FileKind> {
        FileKind::of(&self.file)
    }

    /// The ordered list of "<section>.<item>" paths declared in this file,
    /// used as the join key when comparing files across environments.
    pub fn item_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        if let Value::Mapping(sections) = &self.tree {
            for (section, body) in sections {
                let Value::Mapping(items) = body else { continue };
                for (item, _) in items {
                    paths.push(format!("{}.{}", key_text(section), key_text(item)));
                }
            }
        }
        paths
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("YAML parse error: {reason} at line {line}, column {column}")]
    Parse {
        reason: String,
        line: usize,
        column: usize,
    },
}

/// Find config files in the repo: every `variables.yaml` / `secrets.yaml`
/// one directory level below the root, where each directory is one
/// environment. Directories and files are visited in sorted order so
/// discovery order is stable across runs and platforms.
pub fn discover_config_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs: Vec<PathBuf> = fs::read_dir(root)
        .with_context(|| format!("Failed listing repo root {}", root.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();

    let mut files = Vec::new();
    for dir in dirs {
        let mut candidates: Vec<PathBuf> = fs::read_dir(&dir)
            .with_context(|| format!("Failed listing environment dir {}", dir.display()))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path
                        .file_name()
                        .and_then(|name| name.to_str())
                        .and_then(FileKind::of)
                        .is_some()
            })
            .collect();
        candidates.sort();
        files.extend(candidates);
    }

    Ok(files)
}

/// Parse one config file's text. A syntactically broken file yields a
/// single parse-error issue and takes no further part in validation.
pub fn parse_document(file: &str, text: &str) -> Result<ConfigDocument, Issue> {
    match serde_yaml::from_str::<Value>(text) {
        Ok(tree) => Ok(ConfigDocument {
            file: file.to_string(),
            tree,
            source: text.to_string(),
        }),
        Err(err) => Err(Issue::new(file, parse_error_message(&err))),
    }
}

/// Load every discovered config file under `root`. Parse failures are
/// collected as issues without aborting the other files.
pub fn load_documents(root: &Path, files: &[PathBuf]) -> Result<(Vec<ConfigDocument>, Vec<Issue>)> {
    let mut docs = Vec::new();
    let mut issues = Vec::new();

    for path in files {
        let rel = relative_name(root, path);
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed reading config file {}", path.display()))?;
        match parse_document(&rel, &text) {
            Ok(doc) => docs.push(doc),
            Err(issue) => issues.push(issue),
        }
    }

    Ok((docs, issues))
}

/// Repo-relative name with forward slashes, e.g. "prod/variables.yaml".
fn relative_name(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn parse_error_message(err: &serde_yaml::Error) -> String {
    match err.location() {
        Some(loc) => {
            // serde_yaml's Display already appends the position; strip it
            // so the structured message doesn't repeat it.
            let mut reason = err.to_string();
            let suffix = format!(" at line {} column {}", loc.line(), loc.column());
            if let Some(stripped) = reason.strip_suffix(&suffix) {
                reason = stripped.to_string();
            }
            LoadError::Parse {
                reason,
                line: loc.line(),
                column: loc.column(),
            }
            .to_string()
        }
        None => format!("YAML parse error: {err}"),
    }
}

/// Mapping keys are nearly always strings, but YAML allows scalars.
pub(crate) fn key_text(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
