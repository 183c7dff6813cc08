use serde::Serialize;
use std::path::PathBuf;

use super::DeclContext;
use crate::{
    cache::CacheKey,
    error::Result,
    templates::{RenderContext, property::PropertyTemplate},
    types::{DeclNode, TypeName},
};

/// A stored property of a mocked type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyModel {
    pub name: String,
    pub type_name: TypeName,
    pub file_path: PathBuf,
    pub offset: usize,
    pub length: usize,
    pub access_level: String,
    pub is_static: bool,
    pub settable: bool,
    pub processed: bool,
}

impl PropertyModel {
    pub fn from_node(node: &DeclNode, ctx: &DeclContext<'_>) -> Self {
        Self {
            name: node.name.clone(),
            type_name: TypeName::new(node.type_name.as_str()),
            file_path: ctx.path.to_path_buf(),
            offset: node.offset,
            length: node.length,
            access_level: node.access_level.clone(),
            is_static: node.is_static,
            settable: node.settable,
            processed: ctx.processed,
        }
    }

    pub fn cache_key(&self) -> CacheKey {
        CacheKey {
            path: self.file_path.clone(),
            name: self.name.clone(),
            type_name: self.type_name.to_string(),
            offset: self.offset,
            length: self.length,
        }
    }

    pub fn render(&self, ctx: &RenderContext<'_>) -> Result<Option<String>> {
        if self.processed {
            return ctx.cache.extract(&self.cache_key()).map(Some);
        }
        let template = PropertyTemplate {
            name: &self.name,
            type_name: &self.type_name,
            is_static: self.is_static,
            access_level: &self.access_level,
            type_keys: ctx.type_keys,
        };
        Ok(Some(template.render()))
    }
}
