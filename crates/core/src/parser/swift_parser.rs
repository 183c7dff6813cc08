use super::{SourceParser, utils::node_text};
use crate::{
    error::{Error, Result},
    types::{DeclKind, DeclNode},
    utils::split_top_level,
};
use std::path::Path;
use tree_sitter::{Node, Parser, Tree};

const ACCESS_LEVELS: &[&str] = &["open", "public", "package", "internal", "fileprivate", "private"];

/// Parsing backend for Swift sources built on the tree-sitter grammar.
///
/// A fresh `tree_sitter::Parser` is created per call so one backend can be
/// shared by every worker of the pipeline.
#[derive(Debug, Default, Clone, Copy)]
pub struct SwiftParser;

impl SwiftParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, source: &str) -> Result<Tree> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_swift::LANGUAGE.into())
            .map_err(|e| Error::TreeSitterError(format!("Failed to set language: {e}")))?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| Error::ParseError("Failed to parse source code".to_string()))?;
        if tree.root_node().has_error() {
            tracing::warn!("Source contains syntax errors; declarations may be incomplete");
        }
        Ok(tree)
    }
}

impl SourceParser for SwiftParser {
    fn parse_nodes(&self, path: &Path, source: &str) -> Result<Vec<DeclNode>> {
        let tree = self.parse(source)?;
        let root = tree.root_node();
        let mut cursor = root.walk();
        let nodes: Vec<DeclNode> = root
            .named_children(&mut cursor)
            .filter_map(|child| decl_node(&child, source))
            .collect();
        tracing::debug!("Found {} top-level declarations in {:?}", nodes.len(), path);
        Ok(nodes)
    }
}

/// Convert one syntax node into a backend-neutral declaration node.
/// Returns `None` for syntax that is not relevant to mocking.
pub(crate) fn decl_node(node: &Node, source: &str) -> Option<DeclNode> {
    match node.kind() {
        "protocol_declaration" => Some(type_decl(node, source, DeclKind::Protocol)),
        "class_declaration" => {
            let kind = match declaration_keyword(node, source)? {
                "class" | "actor" => DeclKind::Class,
                "extension" => DeclKind::Extension,
                _ => return None,
            };
            Some(type_decl(node, source, kind))
        }
        "function_declaration" | "protocol_function_declaration" => {
            Some(callable_decl(node, source, DeclKind::Function))
        }
        "init_declaration" => Some(callable_decl(node, source, DeclKind::Initializer)),
        "subscript_declaration" => Some(callable_decl(node, source, DeclKind::Subscript)),
        "property_declaration" | "protocol_property_declaration" => property_decl(node, source),
        "import_declaration" => {
            let length = node.end_byte() - node.start_byte();
            Some(DeclNode::new(
                DeclKind::Import,
                node_text(node, source).trim(),
                node.start_byte(),
                length,
            ))
        }
        _ => None,
    }
}

fn declaration_keyword<'a>(node: &Node, source: &'a str) -> Option<&'a str> {
    if let Some(kind) = node.child_by_field_name("declaration_kind") {
        return Some(node_text(&kind, source));
    }
    let mut cursor = node.walk();
    let keyword = node
        .children(&mut cursor)
        .filter(|child| !child.is_named())
        .map(|child| node_text(&child, source))
        .find(|text| matches!(*text, "class" | "struct" | "enum" | "extension" | "actor"));
    keyword
}

#[derive(Debug, Default)]
struct Modifiers {
    access_level: String,
    is_static: bool,
    attributes: Vec<String>,
    end: Option<usize>,
}

impl Modifiers {
    fn apply_word(&mut self, word: &str) {
        if ACCESS_LEVELS.contains(&word) {
            if self.access_level.is_empty() {
                self.access_level = word.to_string();
            }
        } else if word == "static" || word == "class" {
            self.is_static = true;
        }
    }

    fn collect(&mut self, modifiers: &Node, source: &str) {
        let mut cursor = modifiers.walk();
        for child in modifiers.children(&mut cursor) {
            if child.kind() == "attribute" {
                self.attributes.push(node_text(&child, source).trim().to_string());
            } else {
                for word in node_text(&child, source).split_whitespace() {
                    self.apply_word(word);
                }
            }
        }
        self.end = Some(modifiers.end_byte());
    }
}

/// Modifiers and attributes of a declaration. Keyword children directly on
/// the node only count for members, where `class` means `class func`.
fn modifiers(node: &Node, source: &str, is_member: bool) -> Modifiers {
    let mut result = Modifiers::default();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "modifiers" => result.collect(&child, source),
            "attribute" => {
                result.attributes.push(node_text(&child, source).trim().to_string());
                result.end = Some(child.end_byte());
            }
            "static" | "class" if is_member && !child.is_named() => result.is_static = true,
            _ => {}
        }
    }
    result
}

fn type_decl(node: &Node, source: &str, kind: DeclKind) -> DeclNode {
    let modifiers = modifiers(node, source, false);
    let length = node.end_byte() - node.start_byte();

    let name_node = node.child_by_field_name("name").or_else(|| {
        let mut cursor = node.walk();
        let found = node
            .named_children(&mut cursor)
            .find(|child| matches!(child.kind(), "type_identifier" | "user_type"));
        found
    });
    let name = name_node
        .map(|n| node_text(&n, source).trim().to_string())
        .unwrap_or_default();

    let body = node.child_by_field_name("body").or_else(|| {
        let mut cursor = node.walk();
        let found = node
            .named_children(&mut cursor)
            .find(|child| child.kind().ends_with("_body"));
        found
    });

    let mut decl = DeclNode::new(kind, name, node.start_byte(), length);
    decl.access_level = modifiers.access_level;
    decl.attributes = modifiers.attributes;
    decl.signature_end = name_node.map_or(node.start_byte(), |n| n.end_byte());
    decl.body_offset = body.map(|b| b.start_byte());

    let header_end = decl.body_offset.unwrap_or(node.end_byte());
    if let Some(header) = source.get(decl.signature_end..header_end) {
        decl.inherited_types = inherited_types(header);
    }

    if let Some(body) = body {
        collect_members(&body, source, &mut decl.children);
    }

    decl
}

/// Member declarations of a type body, looking through grouping nodes.
fn collect_members(body: &Node, source: &str, members: &mut Vec<DeclNode>) {
    let mut cursor = body.walk();
    for child in body.named_children(&mut cursor) {
        match decl_node(&child, source) {
            Some(member) if !member.kind.is_type() && member.kind != DeclKind::Import => {
                members.push(member);
            }
            Some(_) => {}
            None if child.kind().ends_with("_declarations") => {
                collect_members(&child, source, members);
            }
            None => {}
        }
    }
}

/// Parse `<T>: Base, Other where ...` into `["Base", "Other"]`.
fn inherited_types(header: &str) -> Vec<String> {
    let mut rest = header.trim_start();
    if rest.starts_with('<') {
        let mut depth = 0;
        let mut close = None;
        for (index, ch) in rest.char_indices() {
            match ch {
                '<' => depth += 1,
                '>' => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(index);
                        break;
                    }
                }
                _ => {}
            }
        }
        if let Some(index) = close {
            rest = &rest[index + 1..];
        }
    }
    let Some(list) = rest.trim_start().strip_prefix(':') else {
        return Vec::new();
    };
    let list = list.split(" where ").next().unwrap_or_default();
    split_top_level(list, ',')
        .into_iter()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn callable_decl(node: &Node, source: &str, kind: DeclKind) -> DeclNode {
    let modifiers = modifiers(node, source, true);
    let start = node.start_byte();
    let end = node.end_byte();

    let mut generics = Vec::new();
    let mut params = Vec::new();
    let mut labels = Vec::new();
    let mut signature_end = None;

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "type_parameters" => {
                let mut inner = child.walk();
                generics.extend(
                    child
                        .named_children(&mut inner)
                        .filter(|param| param.kind() == "type_parameter")
                        .map(|param| generic_param_decl(&param, source)),
                );
            }
            "parameter" => {
                let (label, param) = param_decl(&child, source);
                labels.push(label);
                params.push(param);
            }
            ")" if !child.is_named() && signature_end.is_none() => {
                signature_end = Some(child.end_byte());
            }
            _ => {}
        }
    }

    let base_name = match kind {
        DeclKind::Initializer => "init".to_string(),
        DeclKind::Subscript => "subscript".to_string(),
        _ => node
            .child_by_field_name("name")
            .map(|n| node_text(&n, source).trim().to_string())
            .unwrap_or_else(|| function_name_from_text(node_text(node, source))),
    };
    let raw_name = format!(
        "{base_name}({})",
        labels.iter().map(|label| format!("{label}:")).collect::<String>()
    );

    let signature_end = signature_end.unwrap_or(start);
    let body_offset = source
        .get(signature_end..end)
        .and_then(|rest| rest.find('{'))
        .map(|index| signature_end + index);
    let header = source
        .get(signature_end..body_offset.unwrap_or(end))
        .unwrap_or_default();

    let mut decl = DeclNode::new(kind, raw_name, start, end - start);
    decl.signature_end = signature_end;
    decl.body_offset = body_offset;
    decl.type_name = return_type(header);
    decl.is_static = modifiers.is_static;
    decl.access_level = modifiers.access_level;
    decl.attributes = modifiers.attributes;
    decl.children = generics.into_iter().chain(params).collect();
    decl
}

fn function_name_from_text(text: &str) -> String {
    text.split("func ")
        .nth(1)
        .map(|rest| {
            rest.chars()
                .take_while(|c| !matches!(c, '(' | '<') && !c.is_whitespace())
                .collect()
        })
        .unwrap_or_default()
}

fn return_type(header: &str) -> String {
    match header.find("->") {
        Some(index) => header[index + 2..]
            .split(" where ")
            .next()
            .unwrap_or_default()
            .trim()
            .to_string(),
        None => String::new(),
    }
}

/// Returns the argument label together with the parameter node, whose name
/// is the internal parameter name.
fn param_decl(node: &Node, source: &str) -> (String, DeclNode) {
    let text = node_text(node, source);
    let (names, type_text) = text.split_once(':').unwrap_or((text, ""));
    let names: Vec<&str> = names.split_whitespace().collect();
    let (label, name) = match names.as_slice() {
        [label, name, ..] => (label.to_string(), name.to_string()),
        [name] => (name.to_string(), name.to_string()),
        [] => ("_".to_string(), String::new()),
    };

    let mut param = DeclNode::new(
        DeclKind::Parameter,
        name,
        node.start_byte(),
        node.end_byte() - node.start_byte(),
    );
    param.type_name = type_text.trim().to_string();
    (label, param)
}

fn generic_param_decl(node: &Node, source: &str) -> DeclNode {
    let text = node_text(node, source);
    let (name, constraint) = text.split_once(':').unwrap_or((text, ""));
    let mut param = DeclNode::new(
        DeclKind::GenericParameter,
        name.trim(),
        node.start_byte(),
        node.end_byte() - node.start_byte(),
    );
    param.type_name = constraint.trim().to_string();
    param
}

fn property_decl(node: &Node, source: &str) -> Option<DeclNode> {
    let modifiers = modifiers(node, source, true);
    let start = node.start_byte();
    let end = node.end_byte();
    let text_start = modifiers.end.unwrap_or(start);
    let text = source.get(text_start..end)?;

    let (keyword_index, keyword) = ["var ", "let "]
        .iter()
        .filter_map(|keyword| text.find(keyword).map(|index| (index, keyword.trim())))
        .min_by_key(|(index, _)| *index)?;

    let after_keyword = &text[keyword_index + keyword.len()..];
    let leading = after_keyword.len() - after_keyword.trim_start().len();
    let after_keyword = after_keyword.trim_start();
    let name: String = after_keyword
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_' || *c == '`')
        .collect();
    if name.is_empty() {
        return None;
    }

    let name_end = text_start + keyword_index + keyword.len() + leading + name.len();
    let remainder = &after_keyword[name.len()..];
    let assign = remainder.find('=');
    let brace = remainder.find('{');
    // `var handler = { ... }()` initializes a stored value
    let block = match (brace, assign) {
        (Some(b), Some(a)) if a < b => None,
        (Some(b), _) => Some(&remainder[b..]),
        _ => None,
    };

    let type_name = remainder
        .trim_start()
        .strip_prefix(':')
        .map(|rest| {
            let stop = rest.find(['=', '{']).unwrap_or(rest.len());
            rest[..stop].trim().to_string()
        })
        .unwrap_or_default();

    let settable = keyword == "var"
        && block.is_none_or(|block| {
            block.contains("set") || block.contains("didSet") || block.contains("willSet")
        });

    let mut decl = DeclNode::new(DeclKind::Property, name, start, end - start);
    decl.signature_end = name_end;
    decl.body_offset = block.map(|b| end - b.len());
    decl.type_name = type_name;
    decl.is_static = modifiers.is_static;
    decl.access_level = modifiers.access_level;
    decl.attributes = modifiers.attributes;
    decl.settable = settable;
    decl.computed = block.is_some() && !settable;
    Some(decl)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse(source: &str) -> Vec<DeclNode> {
        SwiftParser::new()
            .parse_nodes(&PathBuf::from("Test.swift"), source)
            .unwrap()
    }

    #[test]
    fn test_parser_creation() {
        let tree = SwiftParser::new().parse("");
        assert!(tree.is_ok());
    }

    #[test]
    fn test_protocol_with_function() {
        let source = r#"import Foundation

/// @mockable
public protocol Api: AnyObject {
    func fetch(id: Int, from user: String) async throws -> Data
}
"#;
        let nodes = parse(source);
        let import = nodes.iter().find(|n| n.kind == DeclKind::Import).unwrap();
        assert_eq!(import.name, "import Foundation");

        let protocol = nodes.iter().find(|n| n.kind == DeclKind::Protocol).unwrap();
        assert_eq!(protocol.name, "Api");
        assert_eq!(protocol.access_level, "public");
        assert_eq!(protocol.inherited_types, vec!["AnyObject"]);
        assert_eq!(protocol.children.len(), 1);

        let function = &protocol.children[0];
        assert_eq!(function.kind, DeclKind::Function);
        assert_eq!(function.name, "fetch(id:from:)");
        assert_eq!(function.type_name, "Data");

        let params: Vec<_> = function.params().collect();
        assert_eq!(params.len(), 2);
        assert_eq!(params[1].name, "user");
        assert_eq!(params[1].type_name, "String");

        let text = &source[function.offset..function.end()];
        assert!(text.starts_with("func fetch"));
    }

    #[test]
    fn test_initializer_subscript_and_properties() {
        let source = r#"protocol Store {
    init(x: Int, y: Int)
    subscript(key: String) -> Int { get }
    var count: Int { get }
    var name: String { get set }
    static func make() -> Self
}
"#;
        let nodes = parse(source);
        let store = &nodes[0];
        let kinds: Vec<_> = store.children.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DeclKind::Initializer,
                DeclKind::Subscript,
                DeclKind::Property,
                DeclKind::Property,
                DeclKind::Function,
            ]
        );

        assert_eq!(store.children[0].name, "init(x:y:)");
        assert_eq!(store.children[1].name, "subscript(key:)");
        assert_eq!(store.children[1].type_name, "Int");

        let count = &store.children[2];
        assert_eq!(count.name, "count");
        assert!(count.computed);
        assert!(!count.settable);

        let name = &store.children[3];
        assert_eq!(name.type_name, "String");
        assert!(name.settable);
        assert!(!name.computed);

        assert!(store.children[4].is_static);
    }

    #[test]
    fn test_class_and_struct() {
        let source = "struct Point { var x: Int }\nclass ApiMock: Api {\n    var fetchCallCount = 0\n}\n";
        let nodes = parse(source);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].kind, DeclKind::Class);
        assert_eq!(nodes[0].name, "ApiMock");
        assert_eq!(nodes[0].inherited_types, vec!["Api"]);
        assert_eq!(nodes[0].children[0].name, "fetchCallCount");
        assert!(nodes[0].children[0].settable);
    }

    #[test]
    fn test_inherited_types_header() {
        assert_eq!(inherited_types(": A, B<C, D>"), vec!["A", "B<C, D>"]);
        assert_eq!(inherited_types("<T: Hashable>: Base where T: Codable"), vec!["Base"]);
        assert!(inherited_types(" ").is_empty());
    }

    #[test]
    fn test_return_type_header() {
        assert_eq!(return_type(" async throws -> [String: Int]"), "[String: Int]");
        assert_eq!(return_type(" -> T where T: Codable"), "T");
        assert_eq!(return_type(" throws"), "");
    }
}
