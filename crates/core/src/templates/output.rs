use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;

use super::{MockClassTemplate, RenderContext};
use crate::{
    cache::SourceCache,
    config::GeneratorConfig,
    error::Result,
    models::{Entity, EntityKind, Member},
    parser::imports::imported_module,
    pipeline::ImportMap,
};

/// Stored flag every generated mock declares for itself
const INIT_MARKER: &str = "_doneInit";

/// Settings that shape the assembled output file.
#[derive(Debug, Clone, Default)]
pub struct OutputOptions<'a> {
    pub header: Option<&'a str>,
    pub custom_imports: &'a [String],
    pub excluded_imports: &'a [String],
    pub testable_imports: &'a [String],
    pub mock_final: bool,
}

impl<'a> From<&'a GeneratorConfig> for OutputOptions<'a> {
    fn from(config: &'a GeneratorConfig) -> Self {
        Self {
            header: config.header.as_deref(),
            custom_imports: &config.custom_imports,
            excluded_imports: &config.excluded_imports,
            testable_imports: &config.testable_imports,
            mock_final: config.mock_final,
        }
    }
}

/// Index of everything the run knows about, by declared name.
struct Catalog<'a> {
    protocols: HashMap<&'a str, &'a Entity>,
    /// Processed mock classes keyed by the protocol they mock
    processed_mocks: HashMap<&'a str, &'a Entity>,
}

impl<'a> Catalog<'a> {
    fn new(entities: &'a [Entity]) -> Self {
        let mut protocols = HashMap::new();
        let mut processed_mocks = HashMap::new();
        for entity in entities {
            match entity.kind {
                EntityKind::Protocol if !entity.is_processed => {
                    protocols.entry(entity.name.as_str()).or_insert(entity);
                }
                EntityKind::Class if entity.is_processed => {
                    if let Some(mocked) = entity.mocked_name() {
                        processed_mocks.entry(mocked).or_insert(entity);
                    }
                }
                _ => {}
            }
        }
        Self {
            protocols,
            processed_mocks,
        }
    }

    fn targets(&self) -> Vec<&'a Entity> {
        let mut targets: Vec<&Entity> = self
            .protocols
            .values()
            .filter(|entity| entity.is_annotated)
            .filter(|entity| !self.processed_mocks.contains_key(entity.name.as_str()))
            .copied()
            .collect();
        targets.sort_by(|a, b| a.name.cmp(&b.name));
        targets
    }

    /// `Api` defaults to `ApiMock()` for every protocol that has a mock.
    fn type_keys(&self) -> HashMap<String, String> {
        self.protocols
            .values()
            .filter(|entity| entity.is_annotated)
            .map(|entity| entity.name.clone())
            .chain(self.processed_mocks.keys().map(|name| name.to_string()))
            .map(|name| {
                let value = format!("{name}Mock()");
                (name, value)
            })
            .collect()
    }

    /// Own members followed by inherited ones. A requirement restated along
    /// the inheritance chain is kept once, first declaration wins; overloads
    /// that only share a `full_name` all stay.
    fn flatten(&self, entity: &'a Entity) -> (Vec<&'a Member>, Vec<&'a Path>) {
        let mut members = Vec::new();
        let mut files = vec![entity.file_path.as_path()];
        let mut seen_members = HashSet::new();
        let mut seen_types = HashSet::from([entity.name.as_str()]);

        self.collect(entity, &mut members, &mut files, &mut seen_members, &mut seen_types);
        (members, files)
    }

    fn collect(
        &self,
        entity: &'a Entity,
        members: &mut Vec<&'a Member>,
        files: &mut Vec<&'a Path>,
        seen_members: &mut HashSet<String>,
        seen_types: &mut HashSet<&'a str>,
    ) {
        for member in &entity.members {
            if member.name() == INIT_MARKER {
                continue;
            }
            if seen_members.insert(member.signature_key()) {
                members.push(member);
            }
        }

        for parent in &entity.inherited_types {
            let parent = parent.as_str();
            if !seen_types.insert(parent) {
                continue;
            }
            // A parent with an existing mock contributes its generated text
            let source = self
                .processed_mocks
                .get(parent)
                .or_else(|| self.protocols.get(parent))
                .copied();
            if let Some(source) = source {
                tracing::debug!("Flattening '{}' into '{}'", parent, entity.name);
                files.push(source.file_path.as_path());
                self.collect(source, members, files, seen_members, seen_types);
            }
        }
    }
}

/// Import lines for the output: file imports plus custom ones, minus
/// excluded modules, with testable modules upgraded to `@testable`.
fn render_imports(files: &[&Path], imports: &ImportMap, options: &OutputOptions<'_>) -> Vec<String> {
    let mut modules = BTreeSet::new();
    for file in files {
        for statement in imports.get(*file).into_iter().flatten() {
            if let Some(module) = imported_module(statement) {
                modules.insert(module.to_string());
            }
        }
    }
    modules.extend(options.custom_imports.iter().cloned());
    modules.extend(options.testable_imports.iter().cloned());

    let mut lines: Vec<String> = modules
        .into_iter()
        .filter(|module| !options.excluded_imports.contains(module))
        .map(|module| {
            if options.testable_imports.contains(&module) {
                format!("@testable import {module}")
            } else {
                format!("import {module}")
            }
        })
        .collect();
    lines.sort();
    lines.dedup();
    lines
}

/// Assemble one output file from every entity collected by a run.
///
/// Annotated protocols without an existing mock each get a `{Name}Mock`
/// class, in name order, after the optional header and the imports.
pub fn render_output(
    entities: &[Entity],
    imports: &ImportMap,
    options: &OutputOptions<'_>,
    cache: &SourceCache,
) -> Result<String> {
    let catalog = Catalog::new(entities);
    let type_keys = catalog.type_keys();
    let ctx = RenderContext {
        type_keys: &type_keys,
        cache,
    };

    let mut files = Vec::new();
    let mut mocks = Vec::new();
    for target in catalog.targets() {
        let (members, contributing) = catalog.flatten(target);
        files.extend(contributing);
        let template = MockClassTemplate {
            entity: target,
            members,
            mock_final: options.mock_final,
        };
        mocks.push(template.render(&ctx)?);
    }
    tracing::info!("Rendered {} mock(s)", mocks.len());

    let mut sections = Vec::new();
    if let Some(header) = options.header.filter(|header| !header.is_empty()) {
        sections.push(header.trim_end().to_string());
    }
    let import_lines = render_imports(&files, imports, options);
    if !import_lines.is_empty() {
        sections.push(import_lines.join("\n"));
    }
    sections.extend(mocks);

    let mut output = sections.join("\n\n");
    output.push('\n');
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn entity(name: &str, kind: EntityKind, path: &str) -> Entity {
        Entity {
            name: name.to_string(),
            kind,
            file_path: PathBuf::from(path),
            access_level: String::new(),
            attributes: Vec::new(),
            inherited_types: Vec::new(),
            is_annotated: true,
            is_processed: false,
            offset: 0,
            length: 0,
            members: Vec::new(),
        }
    }

    #[test]
    fn test_targets_skip_unannotated_and_processed() {
        let mut hidden = entity("Hidden", EntityKind::Protocol, "Hidden.swift");
        hidden.is_annotated = false;
        let mut existing = entity("OldMock", EntityKind::Class, "Mocks.swift");
        existing.is_processed = true;
        let entities = vec![
            entity("Zeta", EntityKind::Protocol, "Zeta.swift"),
            entity("Alpha", EntityKind::Protocol, "Alpha.swift"),
            entity("Old", EntityKind::Protocol, "Old.swift"),
            hidden,
            existing,
        ];

        let catalog = Catalog::new(&entities);
        let names: Vec<_> = catalog.targets().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);

        let keys = catalog.type_keys();
        assert_eq!(keys.get("Alpha").map(String::as_str), Some("AlphaMock()"));
        assert_eq!(keys.get("Old").map(String::as_str), Some("OldMock()"));
        assert!(!keys.contains_key("Hidden"));
    }

    #[test]
    fn test_imports_are_merged_and_filtered() {
        let mut imports = ImportMap::new();
        imports.insert(
            PathBuf::from("A.swift"),
            vec!["import Foundation".to_string(), "import UIKit".to_string()],
        );
        imports.insert(
            PathBuf::from("B.swift"),
            vec!["import Foundation".to_string(), "@testable import App".to_string()],
        );
        imports.insert(PathBuf::from("Unused.swift"), vec!["import Combine".to_string()]);

        let custom = vec!["XCTest".to_string()];
        let excluded = vec!["UIKit".to_string()];
        let testable = vec!["App".to_string()];
        let options = OutputOptions {
            custom_imports: &custom,
            excluded_imports: &excluded,
            testable_imports: &testable,
            ..Default::default()
        };

        let files = [Path::new("A.swift"), Path::new("B.swift")];
        assert_eq!(
            render_imports(&files, &imports, &options),
            vec!["@testable import App", "import Foundation", "import XCTest"]
        );
    }

    #[test]
    fn test_empty_run_renders_header_only() -> Result<()> {
        let options = OutputOptions {
            header: Some("// Generated by mocksmith\n"),
            ..Default::default()
        };
        let output = render_output(&[], &ImportMap::new(), &options, &SourceCache::new())?;
        assert_eq!(output, "// Generated by mocksmith\n");
        Ok(())
    }
}
