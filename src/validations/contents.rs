use crate::config::ConfigDocument;
use crate::issue::Issue;

/// Escape-annotation marker. `# @allow-string:dev` on a comment line
/// immediately above a value permits the substring "dev" in that value.
const ALLOW_MARKER: &str = "@allow-string:";

/// Validate that none of the values in a config contain forbidden
/// strings. Mostly used to keep dev/eval leftovers out of prod configs,
/// but parameterized so any environment can be checked.
///
/// The check runs over the raw source text, not the decoded tree,
/// because it needs line numbers and the comments preceding each value,
/// both of which the YAML decoder drops. Matching is case-insensitive
/// substring containment; issue messages preserve the forbidden string
/// exactly as the caller spelled it.
pub fn validate_value_contents(doc: &ConfigDocument, forbidden: &[String]) -> Vec<Issue> {
    let mut issues = Vec::new();

    for entry in scan_value_entries(&doc.source) {
        let value_lower = entry.value_text.to_lowercase();
        let permitted = permitted_strings(&entry.comments);

        for bad in forbidden {
            if !value_lower.contains(&bad.to_lowercase()) {
                continue;
            }
            if permitted.iter().any(|p| p.eq_ignore_ascii_case(bad)) {
                continue;
            }
            issues.push(Issue::new(
                &doc.file,
                format!(
                    "Line [{}]: found unallowed string [{bad}] in variable value [{}.{}]. \
                     This string is unallowed in this environment. Update variable value or \
                     add a comment annotation (e.g. '# @allow-string:{bad}') to the preceding line.",
                    entry.line, entry.section, entry.item
                ),
            ));
        }
    }

    issues
}

/// One `value:` definition recovered from raw source, together with the
/// comment lines immediately preceding it inside the same item block.
#[derive(Debug, PartialEq, Eq)]
struct ValueEntry {
    section: String,
    item: String,
    value_text: String,
    /// 1-based source line of the value definition.
    line: usize,
    comments: Vec<String>,
}

#[derive(Debug)]
struct ItemState {
    name: String,
    indent: usize,
    /// Indent of the item's property keys, fixed by the first one seen.
    prop_indent: Option<usize>,
}

/// Line-oriented parse of the structural subset of YAML these config
/// files use: a two-level block mapping whose leaves are `description`
/// and `value` scalars, with whole-line comments in between.
///
/// Comment scoping: comments collect while inside an item block and
/// attach to the next `value:` key. Any other non-comment line inside
/// the block (such as `description:`) resets the pending run, so only
/// comments immediately above the value grant exemptions. Blank lines
/// do not reset the run.
fn scan_value_entries(source: &str) -> Vec<ValueEntry> {
    let lines: Vec<&str> = source.lines().collect();
    let mut entries = Vec::new();
    let mut section: Option<String> = None;
    let mut item: Option<ItemState> = None;
    let mut pending_comments: Vec<String> = Vec::new();

    let mut idx = 0;
    while idx < lines.len() {
        let raw_line = lines[idx];
        let line_no = idx + 1;
        idx += 1;

        let trimmed = raw_line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let indent = raw_line.len() - raw_line.trim_start().len();

        if trimmed.starts_with('#') {
            let inside_item = item.as_ref().is_some_and(|it| indent > it.indent);
            if inside_item {
                pending_comments.push(trimmed.to_string());
            }
            continue;
        }

        let Some((key, rest)) = split_key_line(trimmed) else {
            pending_comments.clear();
            continue;
        };

        if indent == 0 {
            section = Some(key);
            item = None;
            pending_comments.clear();
            continue;
        }

        let Some(section_name) = section.clone() else {
            continue;
        };

        let starts_new_item = match &item {
            None => true,
            Some(it) => indent <= it.indent,
        };
        if starts_new_item {
            item = Some(ItemState {
                name: key,
                indent,
                prop_indent: None,
            });
            pending_comments.clear();
            continue;
        }

        // A line deeper than the item key is one of its properties, or
        // part of a nested value; only first-level properties count.
        let Some(current) = item.as_mut() else {
            continue;
        };
        let prop_indent = *current.prop_indent.get_or_insert(indent);
        if indent == prop_indent && key == "value" {
            let value_text = if block_scalar_header(rest) {
                let (body, consumed) = block_scalar_body(&lines, idx, indent);
                idx += consumed;
                body
            } else {
                scalar_text(rest)
            };
            entries.push(ValueEntry {
                section: section_name,
                item: current.name.clone(),
                value_text,
                line: line_no,
                comments: std::mem::take(&mut pending_comments),
            });
        } else {
            pending_comments.clear();
        }
    }

    entries
}

/// Split a `key: rest` line, rejecting lines that do not look like a
/// block mapping pair (list entries, wrapped scalar text, etc).
fn split_key_line(trimmed: &str) -> Option<(String, &str)> {
    if trimmed.starts_with('-') {
        return None;
    }
    let (raw_key, rest) = trimmed.split_once(':')?;
    let key = unquote(raw_key.trim());
    if key.is_empty() || (key.contains(char::is_whitespace) && key.len() == raw_key.trim().len()) {
        return None;
    }
    Some((key.to_string(), rest))
}

fn unquote(s: &str) -> &str {
    let bytes = s.as_bytes();
    if s.len() >= 2
        && ((bytes[0] == b'"' && bytes[s.len() - 1] == b'"')
            || (bytes[0] == b'\'' && bytes[s.len() - 1] == b'\''))
    {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

/// The scalar text of an inline value, without any trailing comment.
/// A comment starts at a `#` at the start of the scalar or after
/// whitespace; a `#` inside a quoted value is value text.
fn scalar_text(rest: &str) -> String {
    let rest = rest.trim();
    match rest.as_bytes().first() {
        Some(b'"') => quoted_prefix(rest, '"'),
        Some(b'\'') => quoted_prefix(rest, '\''),
        _ => {
            let mut cut = rest.len();
            for (pos, _) in rest.match_indices('#') {
                if pos == 0 || rest.as_bytes()[pos - 1].is_ascii_whitespace() {
                    cut = pos;
                    break;
                }
            }
            rest[..cut].trim_end().to_string()
        }
    }
}

/// Capture a quoted scalar through its closing quote, dropping whatever
/// follows (only a trailing comment can). Double-quoted scalars escape
/// with a backslash, single-quoted ones by doubling the quote.
fn quoted_prefix(s: &str, quote: char) -> String {
    let mut chars = s.char_indices().skip(1).peekable();
    while let Some((pos, c)) = chars.next() {
        if quote == '"' && c == '\\' {
            chars.next();
            continue;
        }
        if c == quote {
            if quote == '\'' {
                if let Some((_, '\'')) = chars.peek() {
                    chars.next();
                    continue;
                }
            }
            return s[..pos + c.len_utf8()].to_string();
        }
    }
    s.to_string()
}

/// Does the text after `value:` announce a block scalar (`|` or `>`,
/// with optional chomping/indentation indicators)?
fn block_scalar_header(rest: &str) -> bool {
    let rest = rest.trim();
    let Some(first) = rest.chars().next() else {
        return false;
    };
    if first != '|' && first != '>' {
        return false;
    }
    let indicators = rest[1..].split_whitespace().next().unwrap_or("");
    indicators
        .chars()
        .all(|c| c.is_ascii_digit() || c == '+' || c == '-')
}

/// Collect the lines that make up a block scalar's body: everything
/// after the header line that is blank or indented deeper than the
/// `value:` key. Returns the joined body text and how many source
/// lines it spans.
fn block_scalar_body(lines: &[&str], start: usize, key_indent: usize) -> (String, usize) {
    let mut body: Vec<&str> = Vec::new();
    let mut consumed = 0;

    for raw in &lines[start..] {
        if raw.trim().is_empty() {
            body.push("");
            consumed += 1;
            continue;
        }
        let indent = raw.len() - raw.trim_start().len();
        if indent <= key_indent {
            break;
        }
        body.push(raw.trim_start());
        consumed += 1;
    }

    while matches!(body.last(), Some(line) if line.is_empty()) {
        body.pop();
    }
    (body.join("\n"), consumed)
}

/// Extract every `@allow-string:<token>` annotation from a run of
/// comment lines. Multiple annotations accumulate, whether stacked
/// across comments or repeated within one.
fn permitted_strings(comments: &[String]) -> Vec<String> {
    let mut permitted = Vec::new();
    for comment in comments {
        for (pos, _) in comment.match_indices(ALLOW_MARKER) {
            let rest = &comment[pos + ALLOW_MARKER.len()..];
            if let Some(token) = rest.split_whitespace().next() {
                permitted.push(token.to_string());
            }
        }
    }
    permitted
}
