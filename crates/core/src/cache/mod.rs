//! Decode cache backing passthrough extraction of previously generated text

pub mod source_cache;

// Re-export the main cache types
pub use source_cache::{CacheKey, SourceCache};
