//! Configuration management for mocksmith

mod settings;

pub use settings::{CONFIG_FILE_NAME, GeneratorConfig};
