//! Concurrent generation pipeline

pub mod generator;
pub mod semaphore;
pub mod sink;

pub use generator::Generator;
pub use semaphore::{Permit, Semaphore};
pub use sink::{CollectedResults, FileResult, ImportMap, ResultSink};
