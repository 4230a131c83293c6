use crate::config::ConfigDocument;
use crate::issue::Issue;

/// Compare a group of config files that should all declare the same set
/// of config items. Catches the mistake where an item gets added in dev
/// but forgotten in prod.
///
/// The check is directional and pairwise: for every ordered pair of
/// files, items present in the first but not the second produce one
/// issue attributed to the second. Callers must partition files by kind
/// first; variables files are only ever compared with variables files.
pub fn validate_matching_items(docs: &[&ConfigDocument]) -> Vec<Issue> {
    let path_sets: Vec<(&str, Vec<String>)> = docs
        .iter()
        .map(|doc| (doc.file.as_str(), doc.item_paths()))
        .collect();

    let mut issues = Vec::new();
    for (i_file, i_paths) in &path_sets {
        for (j_file, j_paths) in &path_sets {
            if i_file == j_file {
                continue;
            }
            let missing: Vec<&str> = i_paths
                .iter()
                .filter(|path| !j_paths.contains(path))
                .map(String::as_str)
                .collect();
            if !missing.is_empty() {
                issues.push(Issue::new(
                    *j_file,
                    format!(
                        "Config mismatch: File [{}] was missing {} config items found in [{}]: [{}]",
                        j_file,
                        missing.len(),
                        i_file,
                        missing.join(",")
                    ),
                ));
            }
        }
    }

    issues
}
