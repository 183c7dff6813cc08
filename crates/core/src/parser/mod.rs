//! Parsing backends that turn Swift sources into declaration nodes

pub mod imports;
pub mod swift_parser;
pub mod utils;
pub mod visitor;

use crate::{error::Result, types::DeclNode};
use std::path::Path;

// Re-export commonly used items
pub use imports::extract_imports;
pub use swift_parser::SwiftParser;
pub use visitor::{DeclVisitor, FileDecls};

/// Index-style backend: given a file, report its top-level declarations.
pub trait SourceParser: Send + Sync {
    fn parse_nodes(&self, path: &Path, source: &str) -> Result<Vec<DeclNode>>;
}
