use anyhow::{Context, Result};
use mocksmith_core::{
    CollectedResults, Generator, GeneratorConfig, OutputOptions, SourceCache, SwiftParser,
    render_output,
};
use parking_lot::Mutex;
use std::time::Instant;
use std::{env, fs};
use tracing::{debug, info};

use crate::cli::GenerateArgs;
use crate::utils::collect_swift_files;

/// File config first, then command line flags on top.
pub fn resolve_config(args: &GenerateArgs) -> Result<GeneratorConfig> {
    let config_path = match &args.config {
        Some(path) => Some(path.clone()),
        None => GeneratorConfig::find_config_file(&env::current_dir()?),
    };

    let mut config = match config_path {
        Some(path) => {
            debug!("Loading config from {}", path.display());
            GeneratorConfig::load_from_file(&path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?
        }
        None => GeneratorConfig::default(),
    };

    if let Some(header) = &args.header {
        config.header = Some(header.clone());
    }
    if let Some(annotation) = &args.annotation {
        config.annotation = annotation.clone();
    }
    if args.concurrency.is_some() {
        config.max_concurrency = args.concurrency;
    }
    config.custom_imports.extend(args.custom_imports.iter().cloned());
    config.excluded_imports.extend(args.exclude_imports.iter().cloned());
    config.testable_imports.extend(args.testable_imports.iter().cloned());
    config.mock_final |= args.mock_final;

    config.validate()?;
    Ok(config)
}

pub fn generate_command(args: &GenerateArgs) -> Result<()> {
    let started = Instant::now();
    let config = resolve_config(args)?;

    let sources = collect_swift_files(&args.sources);
    let mockfiles = collect_swift_files(&args.mockfiles);
    info!(
        "Generating mocks from {} source file(s) and {} mock file(s)",
        sources.len(),
        mockfiles.len()
    );

    let generator = Generator::from_config(&config);
    let parser = SwiftParser::new();
    let sink = Mutex::new(CollectedResults::new());

    generator
        .generate_from_tree(&parser, &sources, false, &sink)
        .context("Failed to parse source files")?;
    generator
        .generate_processed(&parser, &mockfiles, &sink)
        .context("Failed to scan mock files")?;

    let results = sink.into_inner();
    let cache = SourceCache::new();
    let output = render_output(
        &results.entities,
        &results.imports,
        &OutputOptions::from(&config),
        &cache,
    )
    .context("Failed to render mocks")?;

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(path, &output)
                .with_context(|| format!("Failed to write mocks to {}", path.display()))?;
            println!("✅ Wrote mocks to {}", path.display());
        }
        None => print!("{output}"),
    }

    info!(
        "Done in {:.2?} ({} entities, {} passthrough decodes)",
        started.elapsed(),
        results.entities.len(),
        cache.decode_count()
    );
    Ok(())
}
