//! mocksmith - A generator of mock classes for Swift protocols
//!
//! This crate provides functionality to:
//! - Parse Swift sources and build member models for annotated protocols
//! - Render mock classes that count calls and forward to overridable handlers
//! - Process many files concurrently and re-emit previously generated mocks verbatim
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod templates;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{Error, Result};
pub use types::*;

// Re-export main API components
pub use cache::SourceCache;
pub use config::GeneratorConfig;
pub use models::{Entity, Member, MethodModel, SignatureStrategy};
pub use parser::{SourceParser, SwiftParser};
pub use pipeline::{CollectedResults, Generator, ResultSink};
pub use templates::{OutputOptions, render_output};
