//! Text and path helpers shared by the normalizers

use std::path::{Component, Path, PathBuf};

use serde_json::Value;

/// Strip the indentation shared by every non-blank line after the first.
///
/// The first line is left untouched, since doc strings usually start right
/// after the opening quote. Blank lines lose at most the shared indentation.
/// Line endings are normalized: `\r\n` becomes `\n` and a trailing line
/// terminator is dropped.
pub fn correct_indent(text: &str) -> String {
    let mut lines = text.lines();
    let Some(first) = lines.next() else {
        return String::new();
    };
    let rest: Vec<&str> = lines.collect();

    let indent = rest
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| leading_whitespace(line))
        .min()
        .unwrap_or(0);

    let mut out = String::from(first);
    for line in rest {
        out.push('\n');
        out.push_str(strip_leading(line, indent));
    }
    out
}

/// Number of leading whitespace characters.
fn leading_whitespace(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Drop up to `count` leading whitespace characters.
fn strip_leading(line: &str, count: usize) -> &str {
    let offset = line
        .char_indices()
        .take(count)
        .take_while(|(_, c)| c.is_whitespace())
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(0);
    &line[offset..]
}

/// Rewrite `file` relative to the first root that contains it.
///
/// Paths outside every root are returned unchanged.
pub fn relativize(file: &str, roots: &[PathBuf]) -> String {
    let path = Path::new(file);
    roots
        .iter()
        .find_map(|root| path.strip_prefix(root).ok())
        .filter(|relative| relative.components().next().is_some())
        .and_then(slash_path)
        .unwrap_or_else(|| file.to_string())
}

/// Render a relative path with `/` separators.
pub(crate) fn slash_path(path: &Path) -> Option<String> {
    let parts: Option<Vec<&str>> = path
        .components()
        .map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect();
    parts.map(|parts| parts.join("/"))
}

/// Whether a free-form annotation value carries nothing worth emitting.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Keep a string only when it is non-empty.
pub(crate) fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|s| !s.trim().is_empty())
}
