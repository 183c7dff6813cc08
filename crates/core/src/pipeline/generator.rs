use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{FileResult, ImportMap, ResultSink, semaphore::Semaphore};
use crate::{
    config::GeneratorConfig,
    error::{Error, Result},
    models::{DeclContext, DefaultSignatureStrategy, Entity, SignatureStrategy},
    parser::{DeclVisitor, SourceParser, SwiftParser, extract_imports},
    types::DeclKind,
};

/// Fans source files out to workers and hands each file's entities to a
/// shared sink.
#[derive(Clone)]
pub struct Generator {
    max_concurrency: Option<usize>,
    annotation: String,
    strategy: Arc<dyn SignatureStrategy>,
}

impl Default for Generator {
    fn default() -> Self {
        Self {
            max_concurrency: None,
            annotation: "@mockable".to_string(),
            strategy: Arc::new(DefaultSignatureStrategy::default()),
        }
    }
}

impl Generator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new()
            .with_max_concurrency(config.max_concurrency)
            .with_annotation(config.annotation.clone())
            .with_strategy(Arc::new(config.signature))
    }

    /// `None` processes files one after another on the calling thread.
    pub fn with_max_concurrency(mut self, max_concurrency: Option<usize>) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = annotation.into();
        self
    }

    pub fn with_strategy(mut self, strategy: Arc<dyn SignatureStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn max_concurrency(&self) -> Option<usize> {
        self.max_concurrency
    }

    fn context<'a>(&'a self, path: &'a Path, source: &'a str, processed: bool) -> DeclContext<'a> {
        DeclContext {
            path,
            source,
            processed,
            annotation: &self.annotation,
            strategy: self.strategy.as_ref(),
        }
    }

    /// Index-backed pass over previously generated mock files. Every entity
    /// is marked processed so its members are re-emitted verbatim.
    pub fn generate_processed<P, S>(&self, parser: &P, paths: &[PathBuf], sink: &Mutex<S>) -> Result<()>
    where
        P: SourceParser,
        S: ResultSink + Send,
    {
        tracing::info!("Scanning {} processed file(s)", paths.len());
        self.dispatch(paths, |path| {
            let result = self.processed_file(parser, path)?;
            sink.lock().append(result)
        })
    }

    fn processed_file<P: SourceParser>(&self, parser: &P, path: &Path) -> Result<FileResult> {
        let source = std::fs::read_to_string(path)?;
        let nodes = parser.parse_nodes(path, &source)?;
        let ctx = self.context(path, &source, true);

        let first_declaration = nodes
            .iter()
            .filter(|node| node.kind != DeclKind::Import)
            .map(|node| node.offset)
            .min()
            .unwrap_or(source.len());
        let imports = extract_imports(&source, first_declaration);

        let entities = nodes
            .iter()
            .filter(|node| node.kind.is_type())
            .map(|node| Entity::from_node(node, &ctx))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!("{:?}: {} processed entities", path, entities.len());
        Ok(FileResult {
            entities,
            imports: ImportMap::from([(path.to_path_buf(), imports)]),
        })
    }

    /// Syntax-tree pass, used for sources and optionally for mock files.
    pub fn generate_from_tree<S>(
        &self,
        parser: &SwiftParser,
        paths: &[PathBuf],
        processed: bool,
        sink: &Mutex<S>,
    ) -> Result<()>
    where
        S: ResultSink + Send,
    {
        tracing::info!("Parsing {} file(s)", paths.len());
        self.dispatch(paths, |path| {
            let result = self.tree_file(parser, path, processed)?;
            sink.lock().append(result)
        })
    }

    fn tree_file(&self, parser: &SwiftParser, path: &Path, processed: bool) -> Result<FileResult> {
        let source = std::fs::read_to_string(path)?;
        let tree = parser.parse(&source)?;
        let ctx = self.context(path, &source, processed);
        let decls = DeclVisitor::new(&ctx).walk(&tree)?;

        Ok(FileResult {
            entities: decls.entities,
            imports: ImportMap::from([(path.to_path_buf(), decls.imports)]),
        })
    }

    /// Run `work` once per path.
    ///
    /// With a concurrency limit, the calling thread takes a semaphore permit
    /// per file before handing it to the pool, and the permit is returned
    /// when that file is done. After the first failure nothing new is
    /// dispatched; in-flight files finish and that failure is returned.
    fn dispatch<F>(&self, paths: &[PathBuf], work: F) -> Result<()>
    where
        F: Fn(&Path) -> Result<()> + Sync,
    {
        let Some(limit) = self.max_concurrency else {
            for path in paths {
                work(path.as_path()).map_err(|e| e.in_file(path))?;
            }
            return Ok(());
        };

        let limit = limit.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(limit)
            .thread_name(|index| format!("mocksmith-worker-{index}"))
            .build()
            .map_err(|e| Error::PipelineError(format!("Failed to build worker pool: {e}")))?;
        let semaphore = Semaphore::new(limit);
        let first_failure: Mutex<Option<Error>> = Mutex::new(None);

        // The scope body runs on this thread, so blocking on a permit never
        // starves the pool
        pool.in_place_scope(|scope| {
            for path in paths {
                let permit = semaphore.acquire();
                if first_failure.lock().is_some() {
                    tracing::debug!("Stopping dispatch after a failure");
                    break;
                }
                let work = &work;
                let first_failure = &first_failure;
                scope.spawn(move |_| {
                    let _permit = permit;
                    if let Err(err) = work(path.as_path()) {
                        tracing::warn!("Failed to process {:?}: {}", path, err);
                        let mut slot = first_failure.lock();
                        if slot.is_none() {
                            *slot = Some(err.in_file(path));
                        }
                    }
                });
            }
        });

        match first_failure.into_inner() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
