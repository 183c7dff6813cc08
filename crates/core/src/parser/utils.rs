use regex::Regex;
use std::sync::OnceLock;
use tree_sitter::Node;

/// Split a raw declared name such as `foo(bar:_:)` into the bare name and
/// its ordered argument labels.
pub fn split_declared_name(raw: &str) -> (String, Vec<String>) {
    let mut parts = raw
        .split([':', '(', ')'])
        .map(str::trim)
        .filter(|part| !part.is_empty());
    let name = parts.next().unwrap_or_default().to_string();
    let labels = parts.map(str::to_string).collect();
    (name, labels)
}

fn effect_keywords() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"\b(async|rethrows|throws)\b").ok())
        .as_ref()
}

fn accessor_effects() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"\bget((?:\s+(?:async|throws))+)\b").ok())
        .as_ref()
}

/// Effect keywords (`async`, `throws`, `rethrows`) written between the end of
/// a parameter list and the start of the body, joined by a space.
///
/// Only the text before any `->` is considered so return types that happen
/// to contain those words are ignored.
pub fn detect_suffix(source: &str, signature_end: usize, body_start: usize) -> String {
    let Some(between) = source.get(signature_end..body_start.max(signature_end)) else {
        return String::new();
    };
    let Some(pattern) = effect_keywords() else {
        return String::new();
    };
    let effects = between.split("->").next().unwrap_or_default();
    pattern
        .find_iter(effects)
        .map(|found| found.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Effect keywords written on the `get` accessor of a subscript or
/// computed property, e.g. `{ get async throws }`.
pub fn detect_accessor_suffix(source: &str, block_start: usize, block_end: usize) -> String {
    let Some(block) = source.get(block_start..block_end.max(block_start)) else {
        return String::new();
    };
    accessor_effects()
        .and_then(|pattern| pattern.captures(block))
        .and_then(|captures| captures.get(1))
        .map(|effects| effects.as_str().split_whitespace().collect::<Vec<_>>().join(" "))
        .unwrap_or_default()
}

/// Comment lines directly above `offset`, top to bottom.
pub fn leading_comment_block(source: &str, offset: usize) -> Vec<&str> {
    let before = source.get(..offset).unwrap_or(source);
    // Drop whatever precedes the declaration on its own line
    let before = match before.rfind('\n') {
        Some(index) => &before[..index],
        None => return Vec::new(),
    };

    let mut block: Vec<&str> = before
        .lines()
        .rev()
        .map(str::trim)
        .take_while(|line| {
            line.starts_with("//")
                || line.starts_with("/*")
                || line.starts_with('*')
                || line.ends_with("*/")
        })
        .collect();
    block.reverse();
    block
}

/// Text of a tree-sitter node, or an empty string for invalid ranges.
pub fn node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    source.get(node.start_byte()..node.end_byte()).unwrap_or_default()
}
