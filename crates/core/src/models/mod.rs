//! Normalized models of the declarations a mock is generated from.

pub mod closure;
pub mod entity;
pub mod method;
pub mod param;
pub mod property;
pub mod signature;

use std::path::Path;

pub use closure::ClosureModel;
pub use entity::{Entity, EntityKind, Member};
pub use method::{MemberKind, MethodModel};
pub use param::ParamModel;
pub use property::PropertyModel;
pub use signature::{DefaultSignatureStrategy, SignatureInput, SignatureStrategy};

/// Per-file state shared by every model built from one source file.
pub struct DeclContext<'a> {
    pub path: &'a Path,
    pub source: &'a str,
    /// The file holds previously generated mocks
    pub processed: bool,
    pub annotation: &'a str,
    pub strategy: &'a dyn SignatureStrategy,
}
