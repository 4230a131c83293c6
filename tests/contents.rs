use conflint::config::{parse_document, ConfigDocument};
use conflint::validations::validate_value_contents;

fn doc(text: &str) -> ConfigDocument {
    parse_document("prod/variables.yaml", text).unwrap()
}

fn forbid(strings: &[&str]) -> Vec<String> {
    strings.iter().map(|s| s.to_string()).collect()
}

#[test]
fn each_offending_substring_reports_separately() {
    let text = "\
app:
  pool:
    description: which pool to use
    value: use-dev-eval-pool
";
    let issues = validate_value_contents(&doc(text), &forbid(&["dev", "eval"]));
    assert_eq!(issues.len(), 2);
    assert_eq!(
        issues[0].message,
        "Line [4]: found unallowed string [dev] in variable value [app.pool]. \
         This string is unallowed in this environment. Update variable value or \
         add a comment annotation (e.g. '# @allow-string:dev') to the preceding line."
    );
    assert!(issues[1].message.contains("[eval]"));
}

#[test]
fn annotation_removes_exactly_the_allowed_string() {
    let text = "\
app:
  pool:
    description: which pool to use
    # @allow-string:dev
    value: use-dev-eval-pool
";
    let issues = validate_value_contents(&doc(text), &forbid(&["dev", "eval"]));
    assert_eq!(issues.len(), 1);
    assert!(issues[0].message.contains("[eval]"));
}

#[test]
fn stacked_annotations_accumulate() {
    let text = "\
app:
  pool:
    description: which pool to use
    # @allow-string:dev
    # @allow-string:eval something else
    value: use-dev-eval-pool
";
    let issues = validate_value_contents(&doc(text), &forbid(&["dev", "eval"]));
    assert!(issues.is_empty());
}

#[test]
fn blank_line_between_annotation_and_value_keeps_the_exemption() {
    let text = "\
app:
  pool:
    description: which pool to use
    # @allow-string:dev

    value: dev-pool
";
    let issues = validate_value_contents(&doc(text), &forbid(&["dev"]));
    assert!(issues.is_empty());
}

#[test]
fn annotation_above_description_does_not_count() {
    let text = "\
app:
  pool:
    # @allow-string:dev
    description: which pool to use
    value: dev-pool
";
    let issues = validate_value_contents(&doc(text), &forbid(&["dev"]));
    assert_eq!(issues.len(), 1);
}

#[test]
fn annotation_does_not_leak_to_other_items() {
    let text = "\
app:
  pool:
    description: d
    # @allow-string:dev
    value: dev-pool
  host:
    description: d
    value: dev-host
";
    let issues = validate_value_contents(&doc(text), &forbid(&["dev"]));
    assert_eq!(issues.len(), 1);
    assert!(issues[0].message.contains("[app.host]"));
    assert!(issues[0].message.contains("Line [8]"));
}

#[test]
fn matching_is_case_insensitive_but_message_keeps_caller_case() {
    let text = "\
app:
  pool:
    description: d
    value: DEV-pool
";
    let issues = validate_value_contents(&doc(text), &forbid(&["Dev"]));
    assert_eq!(issues.len(), 1);
    assert!(issues[0].message.contains("found unallowed string [Dev]"));
}

#[test]
fn annotation_token_matches_case_insensitively() {
    let text = "\
app:
  pool:
    description: d
    # @allow-string:DEV
    value: dev-pool
";
    let issues = validate_value_contents(&doc(text), &forbid(&["dev"]));
    assert!(issues.is_empty());
}

#[test]
fn trailing_comment_on_the_value_line_is_not_scanned() {
    let text = "\
app:
  pool:
    description: which pool to use
    value: prod-pool # dev note
";
    assert!(validate_value_contents(&doc(text), &forbid(&["dev"])).is_empty());
}

#[test]
fn hash_inside_a_quoted_value_still_counts_as_value_text() {
    let text = "\
app:
  pool:
    description: d
    value: \"prod#dev\" # comment
";
    let issues = validate_value_contents(&doc(text), &forbid(&["dev"]));
    assert_eq!(issues.len(), 1);
    assert!(issues[0].message.contains("[app.pool]"));
}

#[test]
fn block_scalar_values_are_scanned_for_forbidden_strings() {
    let text = "\
app:
  script:
    description: startup script
    value: |
      use-dev-pool
      second line
";
    let issues = validate_value_contents(&doc(text), &forbid(&["dev"]));
    assert_eq!(issues.len(), 1);
    assert!(issues[0].message.contains("Line [4]"));
    assert!(issues[0].message.contains("[app.script]"));
}

#[test]
fn annotation_above_a_block_scalar_still_exempts() {
    let text = "\
app:
  script:
    description: startup script
    # @allow-string:dev
    value: |
      use-dev-pool
";
    assert!(validate_value_contents(&doc(text), &forbid(&["dev"])).is_empty());
}

#[test]
fn clean_values_and_absent_comments_are_fine() {
    let text = "\
app:
  pool:
    description: d
    value: prod-pool
";
    assert!(validate_value_contents(&doc(text), &forbid(&["dev", "eval"])).is_empty());
    assert!(validate_value_contents(&doc(text), &[]).is_empty());
}
