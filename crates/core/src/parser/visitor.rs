//! Syntax-tree walker collecting mockable entities from one file.

use tree_sitter::{Node, Tree};

use super::{swift_parser::decl_node, utils::node_text};
use crate::{
    error::Result,
    models::{DeclContext, Entity},
};

/// Everything collected from one source file
#[derive(Debug, Default)]
pub struct FileDecls {
    pub entities: Vec<Entity>,
    pub imports: Vec<String>,
}

/// Accumulates the entities and imports of a single file.
///
/// A visitor is created per file and consumed by [`DeclVisitor::walk`], so
/// nothing leaks from one file into the next.
pub struct DeclVisitor<'a> {
    ctx: &'a DeclContext<'a>,
    collected: FileDecls,
}

impl<'a> DeclVisitor<'a> {
    pub fn new(ctx: &'a DeclContext<'a>) -> Self {
        Self {
            ctx,
            collected: FileDecls::default(),
        }
    }

    pub fn walk(mut self, tree: &Tree) -> Result<FileDecls> {
        self.visit_node(&tree.root_node())?;
        tracing::debug!(
            "Visited {:?}: {} entities, {} imports",
            self.ctx.path,
            self.collected.entities.len(),
            self.collected.imports.len()
        );
        Ok(self.collected)
    }

    fn visit_node(&mut self, node: &Node) -> Result<()> {
        match node.kind() {
            "import_declaration" => {
                let text = node_text(node, self.ctx.source).trim();
                self.collected.imports.push(text.to_string());
                return Ok(());
            }
            "protocol_declaration" | "class_declaration" => {
                if let Some(decl) = decl_node(node, self.ctx.source) {
                    if decl.kind.is_type() {
                        let entity = Entity::from_node(&decl, self.ctx)?;
                        self.collected.entities.push(entity);
                    }
                }
                // Members were consumed with the type
                return Ok(());
            }
            _ => {}
        }

        for child in node.named_children(&mut node.walk()) {
            self.visit_node(&child)?;
        }

        Ok(())
    }
}
