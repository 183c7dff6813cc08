use serde::Serialize;
use std::collections::HashMap;

use super::param::ParamModel;
use crate::types::TypeName;
use crate::utils::tab;

/// The overridable handler attached to every mocked member except
/// initializers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClosureModel {
    pub generic_names: Vec<String>,
    /// Forwarding expressions, one per parameter
    pub param_names: Vec<String>,
    pub param_types: Vec<TypeName>,
    pub return_type: TypeName,
    pub suffix: String,
    pub is_static: bool,
}

impl ClosureModel {
    pub fn new(
        generic_params: &[ParamModel],
        params: &[ParamModel],
        return_type: &TypeName,
        suffix: &str,
        is_static: bool,
    ) -> Self {
        Self {
            generic_names: generic_params.iter().map(|g| g.name.clone()).collect(),
            param_names: params.iter().map(ParamModel::render_argument).collect(),
            param_types: params.iter().map(|p| p.type_name.clone()).collect(),
            return_type: return_type.clone(),
            suffix: suffix.to_string(),
            is_static,
        }
    }

    fn is_generic(&self, type_name: &TypeName) -> bool {
        self.generic_names.iter().any(|name| type_name.mentions(name))
    }

    fn is_async(&self) -> bool {
        self.suffix.split_whitespace().any(|word| word == "async")
    }

    fn is_throwing(&self) -> bool {
        self.suffix
            .split_whitespace()
            .any(|word| word == "throws" || word == "rethrows")
    }

    /// Optional closure type of the handler slot, e.g. `((Int) -> (String))?`.
    /// Generic types are erased to `Any`.
    pub fn callable_type(&self) -> String {
        let params = self
            .param_types
            .iter()
            .map(|ty| {
                if self.is_generic(ty) {
                    "Any".to_string()
                } else {
                    ty.closure_param_type()
                }
            })
            .collect::<Vec<_>>()
            .join(", ");

        let mut effects = String::new();
        if self.is_async() {
            effects.push_str(" async");
        }
        if self.is_throwing() {
            effects.push_str(" throws");
        }

        let result = if self.return_type.is_void() {
            String::new()
        } else if self.is_generic(&self.return_type) {
            "Any".to_string()
        } else {
            self.return_type.to_string()
        };

        format!("(({params}){effects} -> ({result}))?")
    }

    /// Statements that call `handler` when it is set and otherwise fall back
    /// to a default value of the return type.
    pub fn render_invocation(
        &self,
        handler: &str,
        type_keys: &HashMap<String, String>,
        level: usize,
    ) -> String {
        let returns = !self.return_type.is_void();
        let mut call = String::new();
        if returns {
            call.push_str("return ");
        }
        if self.is_throwing() {
            call.push_str("try ");
        }
        if self.is_async() {
            call.push_str("await ");
        }
        call.push_str(&format!("{handler}({})", self.param_names.join(", ")));
        if returns && self.is_generic(&self.return_type) {
            call.push_str(&format!(" as! {}", self.return_type));
        }

        let mut lines = vec![
            format!("{}if let {handler} = {handler} {{", tab(level)),
            format!("{}{call}", tab(level + 1)),
            format!("{}}}", tab(level)),
        ];

        match self.return_type.default_value(type_keys) {
            Some(value) if value.is_empty() => {}
            Some(value) => lines.push(format!("{}return {value}", tab(level))),
            None => lines.push(format!(
                "{}fatalError(\"{handler} returns can't have a default value thus its handler must be set\")",
                tab(level)
            )),
        }

        lines.join("\n")
    }
}
