/// Import statements written before the first declaration of a file, in
/// source order. Attributed imports such as `@testable import Core` are kept
/// verbatim.
pub fn extract_imports(content: &str, first_declaration_offset: usize) -> Vec<String> {
    let mut end = first_declaration_offset.min(content.len());
    while !content.is_char_boundary(end) {
        end -= 1;
    }

    content[..end]
        .lines()
        .map(str::trim)
        .filter(|line| is_import_line(line))
        .map(str::to_string)
        .collect()
}

fn is_import_line(line: &str) -> bool {
    line.starts_with("import ") || (line.starts_with('@') && line.contains(" import "))
}

/// Module name of an import statement: `@testable import Core.Models` gives
/// `Core.Models`.
pub fn imported_module(statement: &str) -> Option<&str> {
    let (_, rest) = statement.split_once("import ")?;
    rest.split_whitespace().last()
}
