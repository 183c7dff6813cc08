use serde::Serialize;

/// Kind of a declaration node produced by a parsing backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DeclKind {
    Protocol,
    Class,
    Extension,
    Function,
    Initializer,
    Subscript,
    Property,
    Parameter,
    GenericParameter,
    Import,
}

impl DeclKind {
    /// Whether nodes of this kind can own member declarations
    pub fn is_type(self) -> bool {
        matches!(self, DeclKind::Protocol | DeclKind::Class | DeclKind::Extension)
    }
}

/// One declaration as reported by a parsing backend.
///
/// Offsets are byte positions into the UTF-8 text of the owning file.
/// `name` is the raw declared name: callables carry their argument labels in
/// the form `foo(bar:_:)`, everything else carries its plain identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclNode {
    pub kind: DeclKind,
    pub name: String,
    pub offset: usize,
    pub length: usize,
    /// End of the name and parameter list; suffix keywords are searched
    /// between here and `body_offset`.
    pub signature_end: usize,
    pub body_offset: Option<usize>,
    /// Declared (return) type, empty when unknown
    pub type_name: String,
    pub is_static: bool,
    pub access_level: String,
    pub attributes: Vec<String>,
    pub inherited_types: Vec<String>,
    /// Property declared with `var` and a setter (or no accessor block)
    pub settable: bool,
    /// Property whose value is produced by a getter
    pub computed: bool,
    pub children: Vec<DeclNode>,
}

impl DeclNode {
    pub fn new(kind: DeclKind, name: impl Into<String>, offset: usize, length: usize) -> Self {
        Self {
            kind,
            name: name.into(),
            offset,
            length,
            signature_end: offset + length,
            body_offset: None,
            type_name: String::new(),
            is_static: false,
            access_level: String::new(),
            attributes: Vec::new(),
            inherited_types: Vec::new(),
            settable: false,
            computed: false,
            children: Vec::new(),
        }
    }

    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    pub fn is_initializer(&self) -> bool {
        self.kind == DeclKind::Initializer
    }

    pub fn is_generic_type_param(&self) -> bool {
        self.kind == DeclKind::GenericParameter
    }

    pub fn is_var_param(&self) -> bool {
        self.kind == DeclKind::Parameter
    }

    pub fn has_available_attribute(&self) -> bool {
        self.attributes
            .iter()
            .any(|attribute| attribute.starts_with("@available"))
    }

    /// Raw attribute texts whose text contains `filter`
    pub fn extract_attributes(&self, filter: &str) -> Vec<String> {
        self.attributes
            .iter()
            .filter(|attribute| attribute.contains(filter))
            .cloned()
            .collect()
    }

    pub fn params(&self) -> impl Iterator<Item = &DeclNode> {
        self.children.iter().filter(|child| child.is_var_param())
    }

    pub fn generic_params(&self) -> impl Iterator<Item = &DeclNode> {
        self.children
            .iter()
            .filter(|child| child.is_generic_type_param())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_helpers() {
        let mut node = DeclNode::new(DeclKind::Function, "foo()", 10, 20);
        assert!(!node.has_available_attribute());

        node.attributes = vec!["@objc".to_string(), "@available(iOS 13, *)".to_string()];
        assert!(node.has_available_attribute());
        assert_eq!(node.extract_attributes("available"), vec!["@available(iOS 13, *)"]);
        assert_eq!(node.end(), 30);
    }

    #[test]
    fn test_child_filters() {
        let mut node = DeclNode::new(DeclKind::Function, "foo(a:)", 0, 10);
        node.children.push(DeclNode::new(DeclKind::GenericParameter, "T", 3, 1));
        node.children.push(DeclNode::new(DeclKind::Parameter, "a", 5, 6));

        assert_eq!(node.params().count(), 1);
        assert_eq!(node.generic_params().next().map(|g| g.name.as_str()), Some("T"));
        assert!(DeclKind::Protocol.is_type());
        assert!(!DeclKind::Function.is_type());
    }
}
