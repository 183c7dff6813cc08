use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::utils::{capitalize_first, split_top_level};

const INTEGER_TYPES: &[&str] = &[
    "Int", "Int8", "Int16", "Int32", "Int64", "UInt", "UInt8", "UInt16", "UInt32", "UInt64",
];
const FLOAT_TYPES: &[&str] = &["Double", "Float", "Float32", "Float64", "CGFloat", "TimeInterval"];

/// The textual name of a type as written in the source.
///
/// An empty name is the "unknown" sentinel the parsing backends use when a
/// declaration carries no type (a function without a return clause).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into().trim().to_string())
    }

    pub fn unknown() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_unknown(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_void(&self) -> bool {
        matches!(self.0.as_str(), "" | "Void" | "()")
    }

    pub fn is_optional(&self) -> bool {
        self.0.ends_with('?') || self.0.ends_with('!') || self.0.starts_with("Optional<")
    }

    pub fn is_inout(&self) -> bool {
        self.0.starts_with("inout ")
    }

    pub fn is_autoclosure(&self) -> bool {
        self.0.contains("@autoclosure")
    }

    pub fn is_variadic(&self) -> bool {
        self.0.ends_with("...")
    }

    /// Alphanumeric-only rendering used to build signature components:
    /// `[String: Int]` becomes `StringInt`.
    pub fn display_name(&self) -> String {
        self.0
            .split(|c: char| !c.is_alphanumeric())
            .filter(|piece| !piece.is_empty())
            .map(capitalize_first)
            .collect()
    }

    /// Whether `identifier` appears as a whole token in this type.
    pub fn mentions(&self, identifier: &str) -> bool {
        !identifier.is_empty()
            && self
                .0
                .split(|c: char| !(c.is_alphanumeric() || c == '_'))
                .any(|token| token == identifier)
    }

    /// The type as it can appear inside a closure parameter list.
    pub fn closure_param_type(&self) -> String {
        let stripped = self.0.replace("@autoclosure ", "");
        let stripped = stripped.trim();
        match stripped.strip_suffix("...") {
            Some(element) => format!("[{}]", element.trim()),
            None => stripped.to_string(),
        }
    }

    /// Literal used when a mocked member returns without a handler.
    ///
    /// `Some("")` means the type is void and nothing needs returning; `None`
    /// means no sensible default exists.
    pub fn default_value(&self, type_keys: &HashMap<String, String>) -> Option<String> {
        let text = self.0.as_str();
        if let Some(value) = type_keys.get(text) {
            return Some(value.clone());
        }
        if self.is_void() {
            return Some(String::new());
        }
        if self.is_optional() {
            return Some("nil".to_string());
        }
        if text == "Bool" {
            return Some("false".to_string());
        }
        if INTEGER_TYPES.contains(&text) {
            return Some("0".to_string());
        }
        if FLOAT_TYPES.contains(&text) {
            return Some("0.0".to_string());
        }
        if text == "String" || text == "Substring" {
            return Some("\"\"".to_string());
        }
        if text.starts_with('[') && text.ends_with(']') {
            let inner = &text[1..text.len() - 1];
            return if split_top_level(inner, ':').len() > 1 {
                Some("[:]".to_string())
            } else {
                Some("[]".to_string())
            };
        }
        if text.starts_with("Array<") {
            return Some("[]".to_string());
        }
        if text.starts_with("Dictionary<") {
            return Some("[:]".to_string());
        }
        if text.starts_with("Set<") {
            return Some("Set()".to_string());
        }
        if text.starts_with('(') && text.ends_with(')') {
            return tuple_default(&text[1..text.len() - 1], type_keys);
        }
        None
    }
}

fn tuple_default(inner: &str, type_keys: &HashMap<String, String>) -> Option<String> {
    let mut values = Vec::new();
    for element in split_top_level(inner, ',') {
        // Labeled elements: `(count: Int, name: String)`
        let element_type = match split_top_level(element, ':').as_slice() {
            [_, ty] => *ty,
            _ => element,
        };
        values.push(TypeName::new(element_type).default_value(type_keys)?);
    }
    if values.len() == 1 {
        return values.pop();
    }
    Some(format!("({})", values.join(", ")))
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
