use serde::Serialize;
use std::path::PathBuf;

use super::{DeclContext, method::MethodModel, property::PropertyModel};
use crate::{
    error::Result,
    parser::utils::leading_comment_block,
    templates::RenderContext,
    types::{DeclKind, DeclNode},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Protocol,
    Class,
    Extension,
}

/// A member of an entity, in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "member", rename_all = "snake_case")]
pub enum Member {
    Method(MethodModel),
    Property(PropertyModel),
}

impl Member {
    pub fn name(&self) -> &str {
        match self {
            Member::Method(method) => &method.name,
            Member::Property(property) => &property.name,
        }
    }

    pub fn full_name(&self) -> String {
        match self {
            Member::Method(method) => method.full_name(),
            Member::Property(property) => property.name.clone(),
        }
    }

    /// Identity used when merging inherited members
    pub fn signature_key(&self) -> String {
        match self {
            Member::Method(method) => method.signature_key(),
            Member::Property(property) => property.name.clone(),
        }
    }

    pub fn is_initializer(&self) -> bool {
        matches!(self, Member::Method(method) if method.is_initializer())
    }

    pub fn is_processed(&self) -> bool {
        match self {
            Member::Method(method) => method.processed,
            Member::Property(property) => property.processed,
        }
    }

    pub fn render(&self, identifier: &str, ctx: &RenderContext<'_>) -> Result<Option<String>> {
        match self {
            Member::Method(method) => method.render(identifier, ctx),
            Member::Property(property) => property.render(ctx),
        }
    }
}

/// A declared type together with its members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    pub name: String,
    pub kind: EntityKind,
    pub file_path: PathBuf,
    pub access_level: String,
    pub attributes: Vec<String>,
    pub inherited_types: Vec<String>,
    /// Doc comment above the declaration carries the mock annotation
    pub is_annotated: bool,
    pub is_processed: bool,
    pub offset: usize,
    pub length: usize,
    pub members: Vec<Member>,
}

impl Entity {
    pub fn from_node(node: &DeclNode, ctx: &DeclContext<'_>) -> Result<Self> {
        let kind = match node.kind {
            DeclKind::Protocol => EntityKind::Protocol,
            DeclKind::Extension => EntityKind::Extension,
            _ => EntityKind::Class,
        };

        let mut members = Vec::with_capacity(node.children.len());
        for child in &node.children {
            match child.kind {
                DeclKind::Function | DeclKind::Initializer | DeclKind::Subscript => {
                    members.push(Member::Method(MethodModel::from_node(child, ctx)?));
                }
                DeclKind::Property if child.computed => {
                    members.push(Member::Method(MethodModel::from_node(child, ctx)?));
                }
                DeclKind::Property => {
                    members.push(Member::Property(PropertyModel::from_node(child, ctx)));
                }
                _ => {}
            }
        }

        let is_annotated = !ctx.annotation.is_empty()
            && leading_comment_block(ctx.source, node.offset)
                .iter()
                .any(|line| line.contains(ctx.annotation));

        tracing::debug!(
            "Built entity '{}' ({:?}) with {} member(s), annotated: {}",
            node.name,
            kind,
            members.len(),
            is_annotated
        );

        Ok(Self {
            name: node.name.clone(),
            kind,
            file_path: ctx.path.to_path_buf(),
            access_level: node.access_level.clone(),
            attributes: node.attributes.clone(),
            inherited_types: node.inherited_types.clone(),
            is_annotated,
            is_processed: ctx.processed,
            offset: node.offset,
            length: node.length,
            members,
        })
    }

    pub fn mock_name(&self) -> String {
        format!("{}Mock", self.name)
    }

    /// For a previously generated mock class, the protocol it mocks
    pub fn mocked_name(&self) -> Option<&str> {
        self.name.strip_suffix("Mock").filter(|name| !name.is_empty())
    }

    pub fn has_initializer(&self) -> bool {
        self.members.iter().any(Member::is_initializer)
    }
}
