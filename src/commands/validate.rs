use std::path::Path;

use anyhow::{bail, Result};
use tracing::debug;

use crate::config::{self, ConfigDocument, FileKind};
use crate::issue::Issue;
use crate::report;
use crate::validations;

pub struct ValidateOptions {
    /// Strings that must not appear in values of the checked environment.
    pub forbid: Vec<String>,
    /// Environment directory whose values get the forbidden-string scan.
    pub forbid_env: String,
    /// Emit the grouped report as JSON instead of plain text.
    pub json: bool,
}

pub fn run(root: &Path, opts: &ValidateOptions) -> Result<()> {
    println!("Validating repo: {}", root.display());

    let files = config::discover_config_files(root)?;
    let names: Vec<String> = files
        .iter()
        .map(|path| {
            path.strip_prefix(root)
                .unwrap_or(path)
                .display()
                .to_string()
        })
        .collect();
    println!("Found config files: {names:?}");

    let (docs, mut issues) = config::load_documents(root, &files)?;

    // Structure first: every file on its own.
    for doc in &docs {
        debug!(file = %doc.file, "validating structure");
        issues.extend(validations::validate_structure(doc));
    }

    // Then cross-file item parity, one comparison group per file kind.
    for kind in [FileKind::Variables, FileKind::Secrets] {
        let group: Vec<&ConfigDocument> =
            docs.iter().filter(|doc| doc.kind() == Some(kind)).collect();
        issues.extend(validations::validate_matching_items(&group));
    }

    // Finally the forbidden-string scan over the requested environment,
    // e.g. dev/eval values accidentally committed to prod.
    if !opts.forbid.is_empty() {
        let env_prefix = format!("{}/", opts.forbid_env);
        for doc in docs.iter().filter(|doc| doc.file.starts_with(&env_prefix)) {
            debug!(file = %doc.file, "checking value contents");
            issues.extend(validations::validate_value_contents(doc, &opts.forbid));
        }
    }

    emit_report(&issues, opts.json)
}

fn emit_report(issues: &[Issue], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&report::json_report(issues))?);
        if issues.is_empty() {
            return Ok(());
        }
        bail!("{} issue(s) found", issues.len());
    }

    let grouped = report::group_issues_by_file(issues);
    if issues.is_empty() {
        println!("All config files look valid");
    } else {
        eprintln!("{} issue(s) found:", issues.len());
        for file in &grouped {
            eprintln!("Config file [{}] had {} error(s):", file.file, file.errors.len());
            for error in &file.errors {
                eprintln!("    {}: {}", file.file, error);
            }
            eprintln!();
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        bail!("{} issue(s) found", issues.len())
    }
}
