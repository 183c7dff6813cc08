use serde::Serialize;
use std::path::PathBuf;

use super::{
    DeclContext,
    closure::ClosureModel,
    param::ParamModel,
    signature::SignatureInput,
};
use crate::{
    cache::CacheKey,
    error::{Error, Result},
    parser::utils::{detect_accessor_suffix, detect_suffix, split_declared_name},
    templates::{RenderContext, keyword, method::MethodTemplate},
    types::{DeclKind, DeclNode, TypeName},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    Function,
    Initializer,
    Subscript,
    ComputedProperty,
}

/// One callable member of a mocked type, normalized for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodModel {
    /// Declared name including labels, e.g. `foo(bar:_:)`
    pub raw_name: String,
    pub name: String,
    pub file_path: PathBuf,
    offset: usize,
    pub length: usize,
    pub kind: MemberKind,
    pub return_type: TypeName,
    pub access_level: String,
    /// Declaration attributes, kept only when `@available` is among them
    pub attributes: Vec<String>,
    pub generic_params: Vec<ParamModel>,
    pub params: Vec<ParamModel>,
    pub is_static: bool,
    /// `async`, `throws` and `rethrows` as written, space separated
    pub suffix: String,
    /// Already generated mock code, re-emitted verbatim
    pub processed: bool,
    pub handler: Option<ClosureModel>,
    pub signature_components: Vec<String>,
}

impl MethodModel {
    pub fn from_node(node: &DeclNode, ctx: &DeclContext<'_>) -> Result<Self> {
        let kind = match node.kind {
            DeclKind::Initializer => MemberKind::Initializer,
            DeclKind::Subscript => MemberKind::Subscript,
            DeclKind::Property => MemberKind::ComputedProperty,
            _ => MemberKind::Function,
        };

        let (name, labels) = split_declared_name(&node.name);
        let param_nodes: Vec<&DeclNode> = node.params().collect();
        if labels.len() != param_nodes.len() {
            return Err(Error::InconsistentDeclaration {
                path: ctx.path.to_path_buf(),
                name: node.name.clone(),
                labels: labels.len(),
                params: param_nodes.len(),
            });
        }

        let params: Vec<ParamModel> = labels
            .iter()
            .zip(param_nodes)
            .map(|(label, param)| ParamModel::from_node(param, label))
            .collect();
        let generic_params: Vec<ParamModel> = node
            .generic_params()
            .map(|generic| ParamModel::from_node(generic, ""))
            .collect();

        let body_start = node.body_offset.unwrap_or_else(|| node.end());
        let mut suffix = detect_suffix(ctx.source, node.signature_end, body_start);
        // Subscripts and computed properties carry effects on `get`
        if suffix.is_empty() && matches!(kind, MemberKind::Subscript | MemberKind::ComputedProperty) {
            suffix = detect_accessor_suffix(ctx.source, body_start, node.end());
        }
        let return_type = TypeName::new(node.type_name.as_str());

        let attributes = if node.has_available_attribute() {
            node.attributes.clone()
        } else {
            Vec::new()
        };

        let signature_components = ctx.strategy.components(&SignatureInput {
            name: &name,
            params: &params,
            generic_params: &generic_params,
            return_type: &return_type,
        });

        let handler = (kind != MemberKind::Initializer).then(|| {
            ClosureModel::new(&generic_params, &params, &return_type, &suffix, node.is_static)
        });

        Ok(Self {
            raw_name: node.name.clone(),
            name,
            file_path: ctx.path.to_path_buf(),
            offset: node.offset,
            length: node.length,
            kind,
            return_type,
            access_level: node.access_level.clone(),
            attributes,
            generic_params,
            params,
            is_static: node.is_static,
            suffix,
            processed: ctx.processed,
            handler,
            signature_components,
        })
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Move the member, e.g. after content was spliced in front of it.
    pub fn set_offset(&mut self, offset: usize) {
        self.offset = offset;
    }

    pub fn is_initializer(&self) -> bool {
        self.kind == MemberKind::Initializer
    }

    pub fn is_subscript(&self) -> bool {
        self.kind == MemberKind::Subscript
    }

    pub fn static_kind(&self) -> &'static str {
        if self.is_static { "static" } else { "" }
    }

    /// Bare name followed by every signature component
    pub fn full_name(&self) -> String {
        let mut full = self.name.clone();
        for component in &self.signature_components {
            full.push_str(component);
        }
        full
    }

    /// Declared signature: static-ness, labels, generic constraints,
    /// parameter types and return type. Two members share it only when they
    /// declare the same requirement.
    pub fn signature_key(&self) -> String {
        if self.kind == MemberKind::ComputedProperty {
            return self.raw_name.clone();
        }
        let generics: Vec<String> = self
            .generic_params
            .iter()
            .map(|generic| format!("{}:{}", generic.name, generic.type_name))
            .collect();
        let params: Vec<String> = self.params.iter().map(|param| param.type_name.to_string()).collect();
        format!(
            "{}{}<{}>({})->{}",
            keyword(self.static_kind()),
            self.raw_name,
            generics.join(","),
            params.join(","),
            self.return_type
        )
    }

    /// Name extended by `level` signature components. Levels beyond the
    /// available components append how far they overshoot, so every level
    /// yields a distinct, longer name.
    pub fn name_by(&self, level: usize) -> String {
        if level == 0 {
            return self.name.clone();
        }
        let count = self.signature_components.len();
        let postfix = if level > count {
            (level - count).to_string()
        } else {
            self.signature_components[level - 1].clone()
        };
        self.name_by(level - 1) + &postfix
    }

    pub fn cache_key(&self) -> CacheKey {
        CacheKey {
            path: self.file_path.clone(),
            name: self.raw_name.clone(),
            type_name: self.return_type.to_string(),
            offset: self.offset,
            length: self.length,
        }
    }

    /// Mock source for this member under `identifier`.
    ///
    /// Processed members are re-extracted byte for byte instead; processed
    /// initializers render nothing.
    pub fn render(&self, identifier: &str, ctx: &RenderContext<'_>) -> Result<Option<String>> {
        if self.processed {
            if self.is_initializer() {
                return Ok(None);
            }
            return ctx.cache.extract(&self.cache_key()).map(Some);
        }

        let template = MethodTemplate {
            name: &self.name,
            identifier,
            kind: self.kind,
            generic_params: &self.generic_params,
            params: &self.params,
            return_type: &self.return_type,
            is_static: self.is_static,
            access_level: &self.access_level,
            suffix: &self.suffix,
            attributes: &self.attributes,
            handler: self.handler.as_ref(),
            type_keys: ctx.type_keys,
        };
        Ok(Some(template.render()))
    }
}
