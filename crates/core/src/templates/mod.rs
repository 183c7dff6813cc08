//! Text templates that turn member models into mock source.

pub mod method;
pub mod mock_class;
pub mod output;
pub mod property;

use std::collections::HashMap;

use crate::cache::SourceCache;

pub use mock_class::MockClassTemplate;
pub use output::{OutputOptions, render_output};

/// Shared inputs for rendering every member of one output file.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    /// Type name to literal default value, e.g. `Api` to `ApiMock()`
    pub type_keys: &'a HashMap<String, String>,
    /// Decoded sources of processed mock files
    pub cache: &'a SourceCache,
}

/// `"public "` for a non-empty keyword, nothing otherwise.
pub(crate) fn keyword(value: &str) -> String {
    if value.is_empty() {
        String::new()
    } else {
        format!("{value} ")
    }
}
