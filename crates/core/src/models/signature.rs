//! Signature components: the name fragments used to tell overloads apart.

use serde::{Deserialize, Serialize};

use super::param::ParamModel;
use crate::types::TypeName;
use crate::utils::capitalize_first;

/// What a strategy sees of a member when computing its components
#[derive(Debug, Clone, Copy)]
pub struct SignatureInput<'a> {
    pub name: &'a str,
    pub params: &'a [ParamModel],
    pub generic_params: &'a [ParamModel],
    pub return_type: &'a TypeName,
}

/// Policy that turns a member signature into disambiguating name fragments.
///
/// Implementations must be deterministic and return only non-empty strings.
pub trait SignatureStrategy: Send + Sync {
    fn components(&self, input: &SignatureInput<'_>) -> Vec<String>;
}

/// Labels, then generic parameters, then parameter types, then the return type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct DefaultSignatureStrategy {
    /// Labels shorter than this never become a component
    pub min_label_len: usize,
    /// Type display names are truncated to this many characters
    pub max_type_len: usize,
}

impl Default for DefaultSignatureStrategy {
    fn default() -> Self {
        Self {
            min_label_len: 2,
            max_type_len: 32,
        }
    }
}

impl DefaultSignatureStrategy {
    fn label_component(&self, member_name: &str, param: &ParamModel) -> Option<String> {
        let value = if param.label.is_empty() || param.label == "_" {
            param.name.as_str()
        } else {
            param.label.as_str()
        };
        if value.chars().count() < self.min_label_len {
            return None;
        }
        // `getName(name:)` must not become `getNameName`
        if member_name
            .to_lowercase()
            .ends_with(&value.to_lowercase())
        {
            return None;
        }
        Some(capitalize_first(value))
    }

    fn capped(&self, type_name: &TypeName) -> String {
        type_name.display_name().chars().take(self.max_type_len).collect()
    }
}

impl SignatureStrategy for DefaultSignatureStrategy {
    fn components(&self, input: &SignatureInput<'_>) -> Vec<String> {
        let labels = input
            .params
            .iter()
            .filter_map(|param| self.label_component(input.name, param));
        let generics = input
            .generic_params
            .iter()
            .map(|param| capitalize_first(&param.name) + &param.type_name.display_name());
        let types = input.params.iter().map(|param| self.capped(&param.type_name));
        let return_type = std::iter::once(self.capped(input.return_type));

        labels
            .chain(generics)
            .chain(types)
            .chain(return_type)
            .filter(|component| !component.is_empty())
            .collect()
    }
}
