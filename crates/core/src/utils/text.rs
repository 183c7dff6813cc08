/// Indentation used by every rendered template, `level` steps deep.
pub fn tab(level: usize) -> String {
    "    ".repeat(level)
}

/// Uppercase the first character, leaving the rest untouched.
pub fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Split `text` on `separator` while ignoring separators nested inside
/// brackets, parentheses, angle brackets or braces.
pub fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth: i32 = 0;
    let mut start = 0;
    let mut previous = '\0';

    for (index, ch) in text.char_indices() {
        match ch {
            '(' | '[' | '<' | '{' => depth += 1,
            // `->` is an arrow, not a closing angle bracket
            '>' if previous == '-' => {}
            ')' | ']' | '>' | '}' => depth -= 1,
            c if c == separator && depth == 0 => {
                parts.push(&text[start..index]);
                start = index + ch.len_utf8();
            }
            _ => {}
        }
        previous = ch;
    }
    parts.push(&text[start..]);
    parts
}
