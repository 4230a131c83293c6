use serde_yaml::{Mapping, Value};

use crate::config::{key_text, ConfigDocument};
use crate::issue::Issue;

/// A valid config file has the structure:
///
/// ```yaml
/// <section>:
///   <config_item>:
///     description: "..."
///     value: "..."
/// ```
///
/// Rules:
///   - sections may not be empty
///   - config items must have description and value properties
///   - description and value must not be null
///   - config items may not have other properties
///
/// Every malformation becomes an issue; nothing is thrown and a broken
/// section does not stop validation of the sections after it. Issues come
/// out in tree traversal order, which callers rely on for stable output.
pub fn validate_structure(doc: &ConfigDocument) -> Vec<Issue> {
    let mut errors = Vec::new();

    if let Value::Mapping(sections) = &doc.tree {
        for (section_key, body) in sections {
            let section = key_text(section_key);
            validate_section(&section, body, &mut errors);
        }
    }

    errors
        .into_iter()
        .map(|message| Issue::new(&doc.file, message))
        .collect()
}

fn validate_section(section: &str, body: &Value, errors: &mut Vec<String>) {
    if is_empty_section(body) {
        errors.push(format!("Empty section: {section}"));
        return;
    }
    let Value::Mapping(items) = body else {
        errors.push(format!(
            "Children of section [{section}] must be config items! Expected [object], found [{}]",
            type_name(body)
        ));
        return;
    };

    for (item_key, props) in items {
        let path = format!("{section}.{}", key_text(item_key));
        validate_item(&path, props, errors);
    }
}

fn validate_item(path: &str, props: &Value, errors: &mut Vec<String>) {
    let props = match props {
        Value::Mapping(map) => map,
        // A scalar or null item body has neither required property.
        _ => {
            errors.push(format!("Config item [{path}] does not have a description"));
            errors.push(format!("Config item [{path}] does not have a value"));
            return;
        }
    };

    validate_item_field(path, props, "description", errors);
    validate_item_field(path, props, "value", errors);

    for (prop_key, _) in props {
        let prop = key_text(prop_key);
        if prop != "description" && prop != "value" {
            errors.push(format!(
                "Invalid property found on config item [{path}]: {prop}"
            ));
        }
    }
}

/// The missing-key and null-value errors are mutually exclusive so a
/// single bad field never reports twice.
fn validate_item_field(path: &str, props: &Mapping, field: &str, errors: &mut Vec<String>) {
    match props.get(field) {
        None => errors.push(format!("Config item [{path}] does not have a {field}")),
        Some(Value::Null) => errors.push(format!("Config item [{path}] has an empty {field}")),
        Some(_) => {}
    }
}

fn is_empty_section(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::Mapping(map) => map.is_empty(),
        _ => false,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "array",
        Value::Mapping(_) => "object",
        Value::Tagged(_) => "object",
    }
}
