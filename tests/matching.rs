use conflint::config::{parse_document, ConfigDocument};
use conflint::validations::validate_matching_items;

fn doc(file: &str, text: &str) -> ConfigDocument {
    parse_document(file, text).unwrap()
}

#[test]
fn missing_item_is_attributed_to_the_file_lacking_it() {
    let a = doc(
        "prod/variables.yaml",
        "app:\n  x:\n    description: d\n    value: v\n  y:\n    description: d\n    value: v\n",
    );
    let b = doc(
        "dev/variables.yaml",
        "app:\n  x:\n    description: d\n    value: v\n",
    );

    let issues = validate_matching_items(&[&a, &b]);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].file, "dev/variables.yaml");
    assert_eq!(
        issues[0].message,
        "Config mismatch: File [dev/variables.yaml] was missing 1 config items found in [prod/variables.yaml]: [app.y]"
    );
}

#[test]
fn matching_files_produce_no_issues() {
    let text = "app:\n  x:\n    description: d\n    value: v\n";
    let a = doc("prod/variables.yaml", text);
    let b = doc("dev/variables.yaml", text);
    assert!(validate_matching_items(&[&a, &b]).is_empty());
}

#[test]
fn check_is_directional_and_pairwise() {
    // y exists only in prod: each of the other two files gets its own
    // issue, not one merged report.
    let with_y =
        "app:\n  x:\n    description: d\n    value: v\n  y:\n    description: d\n    value: v\n";
    let without_y = "app:\n  x:\n    description: d\n    value: v\n";
    let prod = doc("prod/variables.yaml", with_y);
    let dev = doc("dev/variables.yaml", without_y);
    let eval = doc("eval/variables.yaml", without_y);

    let issues = validate_matching_items(&[&prod, &dev, &eval]);
    assert_eq!(issues.len(), 2);
    assert!(issues.iter().any(|i| i.file == "dev/variables.yaml"));
    assert!(issues.iter().any(|i| i.file == "eval/variables.yaml"));
    assert!(issues.iter().all(|i| i.message.contains("app.y")));
}

#[test]
fn multiple_missing_items_join_with_commas() {
    let a = doc(
        "prod/variables.yaml",
        "app:\n  x:\n    description: d\n    value: v\n  y:\n    description: d\n    value: v\ninfra:\n  z:\n    description: d\n    value: v\n",
    );
    let b = doc("dev/variables.yaml", "{}");

    let issues = validate_matching_items(&[&a, &b]);
    assert_eq!(issues.len(), 1);
    assert_eq!(
        issues[0].message,
        "Config mismatch: File [dev/variables.yaml] was missing 3 config items found in [prod/variables.yaml]: [app.x,app.y,infra.z]"
    );
}

#[test]
fn single_document_group_has_nothing_to_compare() {
    let a = doc(
        "prod/variables.yaml",
        "app:\n  x:\n    description: d\n    value: v\n",
    );
    assert!(validate_matching_items(&[&a]).is_empty());
    assert!(validate_matching_items(&[]).is_empty());
}
