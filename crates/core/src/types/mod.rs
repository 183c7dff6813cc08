pub mod decl;
pub mod type_name;

// Re-export commonly used types
pub use decl::{DeclKind, DeclNode};
pub use type_name::TypeName;
