use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::mpsc;

use crate::{
    error::{Error, Result},
    models::Entity,
};

/// Import statements of each processed file
pub type ImportMap = BTreeMap<PathBuf, Vec<String>>;

/// What one file contributes to a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileResult {
    pub entities: Vec<Entity>,
    pub imports: ImportMap,
}

/// Receiver of per-file results. Calls are serialized by the pipeline.
pub trait ResultSink {
    fn append(&mut self, result: FileResult) -> Result<()>;
}

/// Merges every file result into one ordered collection.
#[derive(Debug, Default)]
pub struct CollectedResults {
    pub entities: Vec<Entity>,
    pub imports: ImportMap,
    pub files: usize,
}

impl CollectedResults {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResultSink for CollectedResults {
    fn append(&mut self, result: FileResult) -> Result<()> {
        self.entities.extend(result.entities);
        self.imports.extend(result.imports);
        self.files += 1;
        Ok(())
    }
}

impl ResultSink for mpsc::Sender<FileResult> {
    fn append(&mut self, result: FileResult) -> Result<()> {
        self.send(result)
            .map_err(|_| Error::PipelineError("Result receiver was dropped".to_string()))
    }
}
