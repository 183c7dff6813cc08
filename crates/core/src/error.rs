use std::io;
use std::path::PathBuf;

/// Errors that can occur while building or rendering mocks
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Tree-sitter error: {0}")]
    TreeSitterError(String),

    /// The backend produced a parameter list that disagrees with the
    /// declared name, e.g. `foo(a:b:)` with a single parameter node.
    #[error(
        "Inconsistent declaration '{name}' in {}: {labels} label(s) but {params} parameter node(s)",
        path.display()
    )]
    InconsistentDeclaration {
        path: PathBuf,
        name: String,
        labels: usize,
        params: usize,
    },

    #[error("Failed to process {}: {source}", path.display())]
    FileFailed {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error("Extraction error: {0}")]
    ExtractionError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Pipeline error: {0}")]
    PipelineError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Attach the file being processed to an error raised by a worker.
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        match self {
            already @ Error::FileFailed { .. } => already,
            other => Error::FileFailed {
                path: path.into(),
                source: Box::new(other),
            },
        }
    }
}

/// Result type alias for mocksmith operations
pub type Result<T> = std::result::Result<T, Error>;
