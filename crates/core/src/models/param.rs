use serde::Serialize;

use crate::types::{DeclNode, TypeName};

/// A parameter of a callable member, or one of its generic parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamModel {
    pub name: String,
    /// Argument label; `_` for unlabeled arguments, equal to `name` when the
    /// declaration has no separate label.
    pub label: String,
    pub type_name: TypeName,
    pub is_generic: bool,
}

impl ParamModel {
    pub fn new(label: impl Into<String>, name: impl Into<String>, type_name: TypeName) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            type_name,
            is_generic: false,
        }
    }

    pub fn generic(name: impl Into<String>, constraint: TypeName) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            type_name: constraint,
            is_generic: true,
        }
    }

    /// Build from a parameter node paired with the label taken from the
    /// owning declaration's raw name.
    pub fn from_node(node: &DeclNode, label: &str) -> Self {
        if node.is_generic_type_param() {
            return Self::generic(node.name.clone(), TypeName::new(node.type_name.as_str()));
        }
        Self::new(label, node.name.clone(), TypeName::new(node.type_name.as_str()))
    }

    /// Declaration fragment: `label name: Type`, `name: Type` or `T: Constraint`.
    pub fn render_decl(&self) -> String {
        if self.is_generic {
            return if self.type_name.is_unknown() {
                self.name.clone()
            } else {
                format!("{}: {}", self.name, self.type_name)
            };
        }
        if self.label.is_empty() || self.label == self.name {
            format!("{}: {}", self.name, self.type_name)
        } else {
            format!("{} {}: {}", self.label, self.name, self.type_name)
        }
    }

    /// Expression forwarding this parameter to a handler closure.
    pub fn render_argument(&self) -> String {
        if self.type_name.is_inout() {
            format!("&{}", self.name)
        } else if self.type_name.is_autoclosure() {
            format!("{}()", self.name)
        } else {
            self.name.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DeclKind;

    #[test]
    fn test_render_decl_variants() {
        let same = ParamModel::new("bar", "bar", TypeName::new("Int"));
        assert_eq!(same.render_decl(), "bar: Int");

        let labeled = ParamModel::new("with", "value", TypeName::new("String"));
        assert_eq!(labeled.render_decl(), "with value: String");

        let unlabeled = ParamModel::new("_", "value", TypeName::new("String"));
        assert_eq!(unlabeled.render_decl(), "_ value: String");

        let generic = ParamModel::generic("T", TypeName::new("Equatable"));
        assert_eq!(generic.render_decl(), "T: Equatable");
        assert_eq!(ParamModel::generic("U", TypeName::unknown()).render_decl(), "U");
    }

    #[test]
    fn test_render_argument() {
        assert_eq!(ParamModel::new("a", "a", TypeName::new("inout Int")).render_argument(), "&a");
        assert_eq!(
            ParamModel::new("a", "a", TypeName::new("@autoclosure () -> Int")).render_argument(),
            "a()"
        );
        assert_eq!(ParamModel::new("a", "a", TypeName::new("Int")).render_argument(), "a");
    }

    #[test]
    fn test_from_node() {
        let mut node = DeclNode::new(DeclKind::Parameter, "value", 0, 12);
        node.type_name = "Int".to_string();
        let param = ParamModel::from_node(&node, "for");
        assert_eq!(param.render_decl(), "for value: Int");

        let mut generic = DeclNode::new(DeclKind::GenericParameter, "T", 0, 1);
        generic.type_name = "Codable".to_string();
        assert!(ParamModel::from_node(&generic, "").is_generic);
    }
}
