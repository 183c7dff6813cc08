//! Small text helpers shared by the models and templates

pub mod text;

pub use text::{capitalize_first, split_top_level, tab};
